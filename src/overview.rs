//! Figures shown on the overview tab: KPI cards, the monthly revenue
//! series and the recent activity feed.
//!
//! The figures are fixed demo data, there is no backend to query.

/// One headline number with its trend note.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub title: &'static str,
    pub value: f64,
    pub prefix: &'static str,
    pub decimals: usize,
    pub change: &'static str,
}

impl Kpi {
    /// `prefix` + value with thousands separators, e.g. `$45,231.89`.
    pub fn display_value(&self) -> String {
        format!("{}{}", self.prefix, group_thousands(self.value, self.decimals))
    }
}

pub fn kpis() -> [Kpi; 4] {
    [
        Kpi {
            title: "Total Revenue",
            value: 45231.89,
            prefix: "$",
            decimals: 2,
            change: "+20.1% from last month",
        },
        Kpi {
            title: "Active Users",
            value: 2350.0,
            prefix: "+",
            decimals: 0,
            change: "+180.1% from last month",
        },
        Kpi {
            title: "Sales",
            value: 12234.0,
            prefix: "+",
            decimals: 0,
            change: "+19% from last month",
        },
        Kpi {
            title: "Active Now",
            value: 573.0,
            prefix: "+",
            decimals: 0,
            change: "+201 since last hour",
        },
    ]
}

/// Revenue in dollars per month, January first.
pub const REVENUE_BY_MONTH: [(&str, u64); 12] = [
    ("Jan", 4000),
    ("Feb", 3000),
    ("Mar", 2000),
    ("Apr", 2780),
    ("May", 1890),
    ("Jun", 2390),
    ("Jul", 3490),
    ("Aug", 4200),
    ("Sep", 5100),
    ("Oct", 4800),
    ("Nov", 5600),
    ("Dec", 6200),
];

pub fn yearly_revenue() -> u64 {
    REVENUE_BY_MONTH.iter().map(|(_, v)| v).sum()
}

/// The month with the highest revenue.
pub fn best_month() -> (&'static str, u64) {
    REVENUE_BY_MONTH
        .iter()
        .copied()
        .max_by_key(|(_, v)| *v)
        .unwrap_or(("-", 0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub user: &'static str,
    pub action: &'static str,
    pub target: &'static str,
    pub time: &'static str,
}

impl Activity {
    /// Stands in for the avatar.
    pub fn initial(&self) -> char {
        self.user.chars().next().unwrap_or('?')
    }
}

pub fn recent_activity() -> Vec<Activity> {
    vec![
        Activity {
            user: "Alice Smith",
            action: "created a new project",
            target: "Marketing Campaign 2024",
            time: "2 hours ago",
        },
        Activity {
            user: "Bob Jones",
            action: "updated the status of",
            target: "Website Redesign",
            time: "4 hours ago",
        },
        Activity {
            user: "Carol White",
            action: "commented on",
            target: "Q1 Financial Report",
            time: "5 hours ago",
        },
        Activity {
            user: "Dave Brown",
            action: "deployed",
            target: "v1.2.0 to Production",
            time: "6 hours ago",
        },
    ]
}

/// `1234567.5` with one decimal gives `1,234,567.5`.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(formatted.len() + digits.len() / 3 + 1);
    if value < 0.0 {
        grouped.push('-');
    }
    for (idx, digit) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
