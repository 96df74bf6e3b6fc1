use anyhow::{Context, Result};

use crate::data::model::{CellValue, Dataset};

/// Serialize the dataset as comma-delimited text: header row, no index.
pub fn to_csv(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(dataset.columns.iter().map(|c| c.name.as_str()))
        .context("writing CSV header")?;

    for (row_no, row) in dataset.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(CellValue::to_csv_field))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("flushing CSV")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::clean;
    use crate::data::loader::load_csv_reader;

    #[test]
    fn header_and_no_index() {
        let ds = load_csv_reader("b,a\n1,x\n2,y\n".as_bytes()).unwrap();
        let text = String::from_utf8(to_csv(&ds).unwrap()).unwrap();
        assert_eq!(text, "b,a\n1,x\n2,y\n");
    }

    #[test]
    fn round_trip_reproduces_values_and_order() {
        let source = "id,label,score,flag,note\n\
                      3,\"north, upper\",1.5,true,\n\
                      1,south,,False,ok\n\
                      2,,4,TRUE,\"quoted \"\"text\"\"\"\n\
                      3,\"north, upper\",1.5,true,\n";
        let (ds, _) = clean(&load_csv_reader(source.as_bytes()).unwrap());

        let exported = to_csv(&ds).unwrap();
        let reparsed = load_csv_reader(exported.as_slice()).unwrap();

        assert_eq!(reparsed, ds);
    }

    #[test]
    fn whole_floats_stay_floats() {
        let ds = load_csv_reader("v\n1.0\n2.5\n".as_bytes()).unwrap();
        let text = String::from_utf8(to_csv(&ds).unwrap()).unwrap();
        assert_eq!(text, "v\n1.0\n2.5\n");
        let reparsed = load_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(reparsed, ds);
    }
}
