use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::DashError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamRole {
    Owner,
    Admin,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Active,
    Invited,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: TeamRole,
    pub status: MemberStatus,
}

impl TeamMember {
    fn new(id: &str, name: &str, email: &str, role: TeamRole, status: MemberStatus) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub price: String,
    pub interval: BillingInterval,
    pub features: Vec<String>,
    pub is_active: bool,
}

impl Plan {
    fn catalogue_entry(name: &str, price: &str, features: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            price: price.to_string(),
            interval: BillingInterval::Monthly,
            features: features.iter().map(|f| f.to_string()).collect(),
            is_active: false,
        }
    }
}

/// Plans a workspace can switch between, cheapest first.
pub fn available_plans() -> Vec<Plan> {
    vec![
        Plan::catalogue_entry(
            "Starter Plan",
            "$0",
            &["Up to 3 projects", "Community support", "Basic analytics"],
        ),
        Plan::catalogue_entry(
            "Pro Plan",
            "$29",
            &[
                "Unlimited projects",
                "Priority support",
                "Advanced analytics",
                "Custom domains",
            ],
        ),
        Plan::catalogue_entry(
            "Enterprise Plan",
            "$99",
            &[
                "Unlimited everything",
                "24/7 Phone support",
                "Dedicated manager",
                "SSO",
            ],
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Email,
    Marketing,
    Security,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub email: bool,
    pub marketing: bool,
    pub security: bool,
}

/// Partial update of [`NotificationPreferences`]; `None` leaves a flag alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationPatch {
    pub email: Option<bool>,
    pub marketing: Option<bool>,
    pub security: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardBrand {
    Visa,
    MasterCard,
    Amex,
    Discover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub brand: CardBrand,
    pub last4: String,
    pub expiry_month: u32,
    pub expiry_year: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsState {
    pub team_members: Vec<TeamMember>,
    pub plan: Plan,
    pub notifications: NotificationPreferences,
    pub payment_method: PaymentMethod,
}

impl Default for SettingsState {
    fn default() -> Self {
        let mut plan = available_plans().swap_remove(1);
        plan.is_active = true;
        Self {
            team_members: vec![
                TeamMember::new("1", "Demo User", "demo@example.com", TeamRole::Owner, MemberStatus::Active),
                TeamMember::new("2", "Sarah Wilson", "sarah@example.com", TeamRole::Member, MemberStatus::Active),
                TeamMember::new("3", "Mike Brown", "mike@example.com", TeamRole::Admin, MemberStatus::Invited),
            ],
            plan,
            notifications: NotificationPreferences {
                email: true,
                marketing: false,
                security: true,
            },
            payment_method: PaymentMethod {
                brand: CardBrand::Visa,
                last4: "4242".to_string(),
                expiry_month: 12,
                expiry_year: 2026,
            },
        }
    }
}

// Hostname labels: letters, digits and inner hyphens, at least two of them.
fn has_dotted_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// RFC 5322 address with a `domain.tld` style host.
pub fn validate_email(email: &str) -> Result<(), DashError> {
    if EmailAddress::is_valid(email) && has_dotted_domain(email) {
        Ok(())
    } else {
        Err(DashError::InvalidEmail(email.to_string()))
    }
}

impl SettingsState {
    /// Adds an invited member named after the local part of `email`.
    pub fn invite_member(&mut self, email: &str) -> Result<&TeamMember, DashError> {
        let email = email.trim();
        validate_email(email)?;
        if self
            .team_members
            .iter()
            .any(|m| m.email.eq_ignore_ascii_case(email))
        {
            return Err(DashError::DuplicateMember(email.to_string()));
        }

        let next_id = self
            .team_members
            .iter()
            .filter_map(|m| m.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let name = email.split('@').next().unwrap_or(email);
        info!("Inviting {email} as member {next_id}");
        self.team_members.push(TeamMember::new(
            &next_id.to_string(),
            name,
            email,
            TeamRole::Member,
            MemberStatus::Invited,
        ));
        Ok(&self.team_members[self.team_members.len() - 1])
    }

    pub fn remove_member(&mut self, id: &str) -> Result<TeamMember, DashError> {
        let idx = self
            .team_members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| DashError::UnknownMember(id.to_string()))?;
        if self.team_members[idx].role == TeamRole::Owner {
            return Err(DashError::OwnerRemoval);
        }
        let removed = self.team_members.remove(idx);
        info!("Removed member {} ({})", removed.id, removed.email);
        Ok(removed)
    }

    pub fn switch_plan(&mut self, name: &str) -> Result<&Plan, DashError> {
        let mut plan = available_plans()
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| DashError::UnknownPlan(name.to_string()))?;
        plan.is_active = true;
        info!("Switched plan {} -> {}", self.plan.name, plan.name);
        self.plan = plan;
        Ok(&self.plan)
    }

    /// Name of the plan after the current one, wrapping around.
    pub fn next_plan_name(&self) -> String {
        let plans = available_plans();
        let idx = plans
            .iter()
            .position(|p| p.name == self.plan.name)
            .map(|i| (i + 1) % plans.len())
            .unwrap_or(0);
        plans[idx].name.clone()
    }

    pub fn update_notifications(&mut self, patch: NotificationPatch) {
        let n = &mut self.notifications;
        n.email = patch.email.unwrap_or(n.email);
        n.marketing = patch.marketing.unwrap_or(n.marketing);
        n.security = patch.security.unwrap_or(n.security);
        debug!("Notifications now {:?}", self.notifications);
    }

    pub fn toggle_notification(&mut self, kind: NotificationKind) -> bool {
        let n = self.notifications;
        let patch = match kind {
            NotificationKind::Email => NotificationPatch {
                email: Some(!n.email),
                ..Default::default()
            },
            NotificationKind::Marketing => NotificationPatch {
                marketing: Some(!n.marketing),
                ..Default::default()
            },
            NotificationKind::Security => NotificationPatch {
                security: Some(!n.security),
                ..Default::default()
            },
        };
        self.update_notifications(patch);
        match kind {
            NotificationKind::Email => self.notifications.email,
            NotificationKind::Marketing => self.notifications.marketing,
            NotificationKind::Security => self.notifications.security,
        }
    }

    /// Takes the card number and an `MM / YY` (or `MM/YYYY`) expiry. Fields
    /// that cannot be read fall back to the demo card's values.
    pub fn update_payment_method(&mut self, card_number: &str, expiry: &str) -> &PaymentMethod {
        let digits: String = card_number.chars().filter(char::is_ascii_digit).collect();
        let last4 = if digits.len() >= 4 {
            digits[digits.len() - 4..].to_string()
        } else {
            "4242".to_string()
        };

        let mut parts = expiry.split('/').map(|s| s.trim().parse::<u32>().ok());
        let expiry_month = parts
            .next()
            .flatten()
            .filter(|m| (1..=12).contains(m))
            .unwrap_or(12);
        let expiry_year = match parts.next().flatten() {
            Some(y) if y < 100 => 2000 + y,
            Some(y) => y,
            None => 2026,
        };

        self.payment_method = PaymentMethod {
            brand: CardBrand::Visa,
            last4,
            expiry_month,
            expiry_year,
        };
        &self.payment_method
    }
}
