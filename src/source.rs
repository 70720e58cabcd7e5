use polars::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::column::ColumnDescriptor;
use crate::domain::DashError;
use crate::record::{Record, RecordId, Value};

#[derive(Debug)]
enum FileType {
    Csv,
    Parquet,
    Arrow,
}

#[derive(Debug)]
struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

struct LoadedColumn {
    name: String,
    values: Vec<Option<Value>>,
}

/// Records plus the columns to show them with.
pub struct Dataset {
    pub name: String,
    pub records: Vec<Record>,
    pub columns: Vec<ColumnDescriptor>,
}

fn text_of(record: &Record, key: &str) -> String {
    record.get(key).map(|v| v.to_string()).unwrap_or_default()
}

/// The built in user directory.
pub fn demo_users() -> Dataset {
    let users = [
        (1, "Lindsay Walton", "lindsay.walton@example.com", "Member", "Active", "3 hours ago"),
        (2, "Courtney Henry", "courtney.henry@example.com", "Admin", "Active", "1 hour ago"),
        (3, "Tom Cook", "tom.cook@example.com", "Member", "Offline", "1 day ago"),
        (4, "Whitney Francis", "whitney.francis@example.com", "Member", "Active", "5 mins ago"),
        (5, "Leonard Krasner", "leonard.krasner@example.com", "Admin", "Offline", "2 days ago"),
        (6, "Floyd Miles", "floyd.miles@example.com", "Member", "Active", "Just now"),
    ];
    let records = users
        .iter()
        .map(|&(id, name, email, role, status, last_active)| {
            Record::new(id)
                .with("name", name)
                .with("email", email)
                .with("role", role)
                .with("status", status)
                .with("lastActive", last_active)
        })
        .collect();

    let columns = vec![
        ColumnDescriptor::new("Name", "name")
            .with_render(|r| format!("{} <{}>", text_of(r, "name"), text_of(r, "email"))),
        ColumnDescriptor::new("Role", "role"),
        ColumnDescriptor::new("Status", "status").with_render(|r| {
            let status = text_of(r, "status");
            let dot = if status == "Active" { "●" } else { "○" };
            format!("{dot} {status}")
        }),
        ColumnDescriptor::new("Last Active", "lastActive"),
    ];

    Dataset {
        name: "Users".to_string(),
        records,
        columns,
    }
}

/// Load a csv, parquet or arrow file. `~` and env vars in `path` are expanded.
#[instrument]
pub fn load_data_file(path: &str) -> Result<Dataset, DashError> {
    let expanded = shellexpand::full(path).map_err(|e| DashError::loading(e.to_string()))?;
    let file_info = get_file_info(PathBuf::from(expanded.into_owned()))?;
    debug!("Loading {:?}", file_info);

    let frame = match file_info.file_type {
        FileType::Csv => load_csv(&file_info.path)?,
        FileType::Parquet => load_parquet(&file_info.path)?,
        FileType::Arrow => load_arrow(&file_info.path)?,
    };

    // Every column is converted in its own rayon task.
    let start_time = Instant::now();
    let df = frame.collect()?;
    let columns: Vec<LoadedColumn> = df
        .get_column_names()
        .par_iter()
        .map(|name| load_column(&df, name))
        .collect::<Result<_, _>>()?;

    let records = build_records(&columns, df.height());
    let descriptors = columns
        .iter()
        .filter(|c| c.name != "id")
        .map(|c| ColumnDescriptor::new(c.name.clone(), c.name.clone()))
        .collect();

    info!(
        "Loaded {} records with {} columns from {} bytes in {}ms",
        records.len(),
        columns.len(),
        file_info.file_size,
        start_time.elapsed().as_millis()
    );

    let name = file_info
        .path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("???")
        .to_string();

    Ok(Dataset {
        name,
        records,
        columns: descriptors,
    })
}

// An `id` column becomes the record id, otherwise the 1-based row number.
fn build_records(columns: &[LoadedColumn], height: usize) -> Vec<Record> {
    let id_column = columns.iter().find(|c| c.name == "id");
    (0..height)
        .into_par_iter()
        .map(|row| {
            let id = match id_column.and_then(|c| c.values[row].as_ref()) {
                // Only exactly representable integers become numeric ids
                Some(Value::Number(n)) if n.fract() == 0.0 && n.abs() < 1e15 => {
                    RecordId::Int(*n as i64)
                }
                Some(value @ Value::Number(_)) => RecordId::Text(value.to_string()),
                Some(Value::Text(s)) => RecordId::Text(s.clone()),
                None => RecordId::Int(row as i64 + 1),
            };
            columns
                .iter()
                .filter(|c| c.name != "id")
                .fold(Record::new(id), |record, column| match &column.values[row] {
                    Some(value) => record.with(column.name.clone(), value.clone()),
                    None => record,
                })
        })
        .collect()
}

fn is_numeric_type(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<LoadedColumn, PolarsError> {
    let column = df.column(col_name)?;
    let values = if is_numeric_type(column.dtype()) {
        let col = column.cast(&DataType::Float64)?;
        col.f64()?.into_iter().map(|v| v.map(Value::Number)).collect()
    } else {
        let col = column.cast(&DataType::String)?;
        col.str()?
            .into_iter()
            .map(|v| v.map(|s| Value::Text(s.replace("\r\n", " ↵ ").replace('\n', " ↵ "))))
            .collect()
    };

    Ok(LoadedColumn {
        name: col_name.to_string(),
        values,
    })
}

fn detect_file_type(path: &Path) -> Result<FileType, DashError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::Csv),
        Some("PARQUET") | Some("PQ") => Ok(FileType::Parquet),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::Arrow),
        _ => Err(DashError::UnknownFileType),
    }
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, DashError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DashError::FileNotFound,
        ErrorKind::PermissionDenied => DashError::PermissionDenied,
        _ => DashError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(DashError::loading("Not a file!"));
    }

    let file_type = detect_file_type(&path)?;

    Ok(FileInfo {
        path,
        file_size: metadata.len(),
        file_type,
    })
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}
