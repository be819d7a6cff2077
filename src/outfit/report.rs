//! CSV audit of a resolution run: one line per scraped row, in page order,
//! with the source tier that produced its catalogue fields.

use std::io::Write;

use super::resolver::ResolutionRecord;

pub const REPORT_HEADER: [&str; 7] = [
    "name",
    "look_type",
    "outfit_id",
    "outfit_name",
    "sex",
    "addons",
    "source",
];

fn optional_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn write_report<W: Write>(writer: W, records: &[ResolutionRecord]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(REPORT_HEADER)?;
    for record in records {
        let descriptor = &record.descriptor;
        csv_writer.write_record([
            record.name.clone(),
            optional_cell(descriptor.look_type),
            optional_cell(descriptor.outfit_id),
            descriptor.outfit_name.clone().unwrap_or_default(),
            optional_cell(descriptor.gender),
            descriptor.addons.to_string(),
            record.source.as_str().to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Whole report as bytes, so nothing touches the disk until every output is ready.
pub fn render_report(records: &[ResolutionRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut buffer = Vec::new();
    write_report(&mut buffer, records)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::outfit::{AppearanceDescriptor, Gender, ResolutionSource};

    #[test]
    fn writes_header_and_rows() {
        let records = vec![
            ResolutionRecord {
                name: "Sam, the smith".to_string(),
                descriptor: Rc::new(AppearanceDescriptor {
                    look_type: Some(128),
                    outfit_id: Some(12),
                    outfit_name: Some("Citizen".to_string()),
                    gender: Some(Gender::Male),
                    addons: 3,
                    ..AppearanceDescriptor::default()
                }),
                source: ResolutionSource::Canonical,
            },
            ResolutionRecord {
                name: "Nobody".to_string(),
                descriptor: Rc::new(AppearanceDescriptor::default()),
                source: ResolutionSource::None,
            },
        ];
        let out = render_report(&records).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,look_type,outfit_id,outfit_name,sex,addons,source\n\
             \"Sam, the smith\",128,12,Citizen,male,3,canonical\n\
             Nobody,,,,,0,none\n"
        );
    }
}
