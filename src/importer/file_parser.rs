// ==========================================
// 车险经营分析引擎 - 文件解析器
// ==========================================
// 职责: 上传文件 → 明细记录数组
// 支持: CSV (.csv) / Excel (.xlsx/.xls, 第一个工作表) / JSON (.json, 对象数组)
// 规则: 表头去首尾空白与 BOM;完全空白的行跳过;单元格原值不做类型推断
// ==========================================

use crate::domain::{CellValue, Record};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ==========================================
// RecordSource - 数据集来源
// ==========================================
pub trait RecordSource {
    fn read_records(&self, path: &Path) -> ImportResult<Vec<Record>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

fn text_cell(raw: &str) -> CellValue {
    let value = raw.trim();
    if value.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(value.to_string())
    }
}

// ==========================================
// CSV
// ==========================================
pub struct CsvSource;

impl RecordSource for CsvSource {
    fn read_records(&self, path: &Path) -> ImportResult<Vec<Record>> {
        ensure_exists(path)?;

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, value)| (header.clone(), text_cell(value)))
                .collect();

            // 跳过完全空白的行
            if record.is_blank() {
                continue;
            }
            records.push(record);
        }

        Ok(records)
    }
}

// ==========================================
// Excel
// ==========================================
pub struct ExcelSource;

impl ExcelSource {
    fn cell_value(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => text_cell(s),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => text_cell(s),
            Data::Error(_) => CellValue::Empty,
        }
    }
}

impl RecordSource for ExcelSource {
    fn read_records(&self, path: &Path) -> ImportResult<Vec<Record>> {
        ensure_exists(path)?;

        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows.next().ok_or(ImportError::MissingHeader)?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| clean_header(&cell.to_string()))
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let record: Record = headers
                .iter()
                .zip(data_row.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.clone(), Self::cell_value(cell)))
                .collect();

            if record.is_blank() {
                continue;
            }
            records.push(record);
        }

        Ok(records)
    }
}

// ==========================================
// JSON
// ==========================================
pub struct JsonSource;

impl RecordSource for JsonSource {
    fn read_records(&self, path: &Path) -> ImportResult<Vec<Record>> {
        ensure_exists(path)?;

        let reader = BufReader::new(File::open(path)?);
        let records: Vec<Record> = serde_json::from_reader(reader)?;
        Ok(records.into_iter().filter(|r| !r.is_blank()).collect())
    }
}

// ==========================================
// 通用解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalRecordSource;

impl RecordSource for UniversalRecordSource {
    fn read_records(&self, path: &Path) -> ImportResult<Vec<Record>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let records = match ext.as_str() {
            "csv" => CsvSource.read_records(path),
            "xlsx" | "xls" | "xlsm" => ExcelSource.read_records(path),
            "json" => JsonSource.read_records(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }?;

        tracing::info!("文件解析完成: {} ({} 行)", path.display(), records.len());
        Ok(records)
    }
}
