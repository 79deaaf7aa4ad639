//! Load the net loss ratio table and ceiling mapping from CSV

use super::{CeilingMap, ExposureRecord, ExposureTable};
use crate::error::{CalcError, CalcResult};
use csv::{ReaderBuilder, Trim};
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default location of the net loss ratio table
pub const DEFAULT_TABLE_PATH: &str = "data/exposure_table.csv";

/// Default location of the ceiling mapping
pub const DEFAULT_CEILINGS_PATH: &str = "data/sum_insured_ceilings.csv";

/// Raw CSV row matching the net loss ratio dataset columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "RISK CODE")]
    risk_code: String,
    #[serde(rename = "TSI RANGE")]
    tsi_range: String,
    #[serde(rename = "ADJ NET LR")]
    adj_net_lr: Option<String>,
    #[serde(rename = "Suggested Share")]
    suggested_share: f64,
    #[serde(rename = "Buffer 15%")]
    buffer: f64,
}

impl CsvRow {
    fn to_record(self, line: u64) -> CalcResult<ExposureRecord> {
        let adjusted_net_loss_ratio = match self.adj_net_lr.as_deref().map(str::trim) {
            None | Some("") | Some("-") => None,
            Some(v) if v.eq_ignore_ascii_case("nan") => None,
            Some(v) => Some(v.parse::<f64>().map_err(|_| {
                CalcError::DataIntegrity(format!("line {}: unparsable ADJ NET LR {:?}", line, v))
            })?),
        };

        Ok(ExposureRecord {
            risk_category: self.risk_code,
            exposure_range: self.tsi_range,
            adjusted_net_loss_ratio,
            suggested_share: self.suggested_share,
            buffer: self.buffer,
        })
    }
}

#[derive(Debug, serde::Deserialize)]
struct CeilingRow {
    #[serde(rename = "TSI RANGE")]
    tsi_range: String,
    #[serde(rename = "CEILING")]
    ceiling: f64,
}

fn integrity(context: &str, err: impl std::fmt::Display) -> CalcError {
    CalcError::DataIntegrity(format!("{}: {}", context, err))
}

/// Load the exposure table from a CSV file
pub fn load_table<P: AsRef<Path>>(path: P) -> CalcResult<ExposureTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| integrity(&path.display().to_string(), e))?;
    let table = load_table_from_reader(file)?;
    info!("loaded {} exposure rows from {}", table.len(), path.display());
    Ok(table)
}

/// Load the exposure table from any reader (e.g., string buffer, S3 object body)
pub fn load_table_from_reader<R: Read>(reader: R) -> CalcResult<ExposureTable> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result.map_err(|e| integrity("exposure table", e))?;
        let line = records.len() as u64 + 2;
        records.push(row.to_record(line)?);
    }

    ExposureTable::new(records)
}

/// Load the exposure table from the default location
pub fn load_default_table() -> CalcResult<ExposureTable> {
    load_table(DEFAULT_TABLE_PATH)
}

/// Load an ordered ceiling mapping from a CSV file
pub fn load_ceilings<P: AsRef<Path>>(path: P) -> CalcResult<CeilingMap> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| integrity(&path.display().to_string(), e))?;
    let map = load_ceilings_from_reader(file)?;
    info!("loaded {} ceiling bands from {}", map.len(), path.display());
    Ok(map)
}

/// Load an ordered ceiling mapping from any reader; row order is match order
pub fn load_ceilings_from_reader<R: Read>(reader: R) -> CalcResult<CeilingMap> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut entries = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CeilingRow = result.map_err(|e| integrity("ceiling mapping", e))?;
        if row.tsi_range.is_empty() {
            return Err(CalcError::DataIntegrity("ceiling mapping: empty TSI RANGE".into()));
        }
        if !row.ceiling.is_finite() || row.ceiling <= 0.0 {
            return Err(CalcError::DataIntegrity(format!(
                "ceiling mapping: invalid ceiling {} for {:?}",
                row.ceiling, row.tsi_range
            )));
        }
        entries.push((row.tsi_range, row.ceiling));
    }

    Ok(CeilingMap::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
RISK CODE,TSI RANGE,ADJ NET LR,Suggested Share,Buffer 15%
2976,\"01. [0, 500 Mio]\",0.55,0.40,0.15
2976,\"05. (10 Bio, 25 Bio]\",0.71,0.20,0.15
2910,\"01. [0, 500 Mio]\",,0,0
2910,\"02. (500 Mio, 1 Bio]\",nan,0.10,0.15
";

    #[test]
    fn test_load_from_reader() {
        let table = load_table_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 4);

        let record = table.lookup("2976", "05. (10 Bio, 25 Bio]").unwrap();
        assert_eq!(record.adjusted_net_loss_ratio, Some(0.71));
        assert_eq!(record.suggested_share, 0.20);

        let blank = table.lookup("2910", "01. [0, 500 Mio]").unwrap();
        assert_eq!(blank.adjusted_net_loss_ratio, None);
        assert!(blank.loss_ratio_placeholder());

        let nan = table.lookup("2910", "02. (500 Mio, 1 Bio]").unwrap();
        assert_eq!(nan.adjusted_net_loss_ratio, None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.risk_categories(), vec!["2976", "2910"]);
    }

    #[test]
    fn test_missing_file_is_data_integrity_error() {
        let err = load_table("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, CalcError::DataIntegrity(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        let bad_share = "RISK CODE,TSI RANGE,ADJ NET LR,Suggested Share,Buffer 15%\n2976,01.,0.5,abc,0.15\n";
        assert!(matches!(
            load_table_from_reader(bad_share.as_bytes()),
            Err(CalcError::DataIntegrity(_))
        ));

        let bad_ratio = "RISK CODE,TSI RANGE,ADJ NET LR,Suggested Share,Buffer 15%\n2976,01.,x,0.4,0.15\n";
        assert!(load_table_from_reader(bad_ratio.as_bytes()).is_err());

        let missing_column = "RISK CODE,TSI RANGE,Suggested Share\n2976,01.,0.4\n";
        assert!(load_table_from_reader(missing_column.as_bytes()).is_err());

        let header_only = "RISK CODE,TSI RANGE,ADJ NET LR,Suggested Share,Buffer 15%\n";
        assert!(load_table_from_reader(header_only.as_bytes()).is_err());
    }

    #[test]
    fn test_load_ceilings_keeps_file_order() {
        let csv = "TSI RANGE,CEILING\n\"05. (10 Bio, 25 Bio]\",25000000000\nBio,1\n";
        let map = load_ceilings_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.resolve("05. (10 Bio, 25 Bio]"), Some(2.5e10));
        assert_eq!(map.resolve("03. (1 Bio, 5 Bio]"), Some(1.0));
    }

    #[test]
    fn test_load_ceilings_rejects_non_positive() {
        let csv = "TSI RANGE,CEILING\n\"01. [0, 500 Mio]\",0\n";
        assert!(load_ceilings_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_load_default_data_files() {
        let table = load_default_table().expect("Failed to load default table");
        assert!(!table.is_empty());
        for record in table.unique_records() {
            assert!(record.buffer >= 0.0);
        }

        let ceilings = load_ceilings(DEFAULT_CEILINGS_PATH).expect("Failed to load ceilings");
        assert_eq!(ceilings, CeilingMap::default_bands());
    }
}
