//! Headerless two-column CSV readers for standards, samples and mass readings.

use anyhow::Context;
use spectrocore::calibration::MassReading;
use spectrocore::interface::{parse_number, parse_or_default};
use spectrocore::{CalibrationError, SampleMeasurement, StandardPoint};
use std::fs::File;
use std::io::Read;
use std::path::Path;

fn records<R: Read>(reader: R) -> anyhow::Result<Vec<csv::StringRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record);
    }
    Ok(rows)
}

fn number(
    field: &str,
    row: usize,
    text: Option<&str>,
    lenient: bool,
) -> Result<f64, CalibrationError> {
    let text = text.unwrap_or("");
    if lenient {
        Ok(parse_or_default(text, 0.0))
    } else {
        parse_number(field, row, text)
    }
}

fn pairs<R: Read>(
    reader: R,
    fields: (&str, &str),
    lenient: bool,
) -> anyhow::Result<Vec<(f64, f64)>> {
    records(reader)?
        .iter()
        .enumerate()
        .map(|(row, record)| -> anyhow::Result<(f64, f64)> {
            Ok((
                number(fields.0, row, record.get(0), lenient)?,
                number(fields.1, row, record.get(1), lenient)?,
            ))
        })
        .collect()
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("opening {}", path.display()))
}

pub fn standards_from_reader<R: Read>(
    reader: R,
    lenient: bool,
) -> anyhow::Result<Vec<StandardPoint>> {
    Ok(pairs(reader, ("concentration", "absorbance"), lenient)?
        .into_iter()
        .map(|(concentration, absorbance)| StandardPoint::new(concentration, absorbance))
        .collect())
}

/// Rows are `label,absorbance`; a lone column is read as the absorbance.
pub fn samples_from_reader<R: Read>(
    reader: R,
    lenient: bool,
) -> anyhow::Result<Vec<SampleMeasurement>> {
    records(reader)?
        .iter()
        .enumerate()
        .map(|(row, record)| -> anyhow::Result<SampleMeasurement> {
            let (label, absorbance) = if record.len() >= 2 {
                (record[0].to_string(), record.get(1))
            } else {
                (format!("Sample {}", row + 1), record.get(0))
            };
            let absorbance = number("absorbance", row, absorbance, lenient)?;
            Ok(SampleMeasurement::new(label, absorbance))
        })
        .collect()
}

pub fn mass_readings_from_reader<R: Read>(
    reader: R,
    lenient: bool,
) -> anyhow::Result<Vec<MassReading>> {
    Ok(pairs(reader, ("mass", "absorbance"), lenient)?
        .into_iter()
        .map(|(mass, absorbance)| MassReading::new(mass, absorbance))
        .collect())
}

pub fn read_standards(path: &Path, lenient: bool) -> anyhow::Result<Vec<StandardPoint>> {
    standards_from_reader(open(path)?, lenient)
        .with_context(|| format!("reading standards from {}", path.display()))
}

pub fn read_samples(path: &Path, lenient: bool) -> anyhow::Result<Vec<SampleMeasurement>> {
    samples_from_reader(open(path)?, lenient)
        .with_context(|| format!("reading samples from {}", path.display()))
}

pub fn read_mass_readings(path: &Path, lenient: bool) -> anyhow::Result<Vec<MassReading>> {
    mass_readings_from_reader(open(path)?, lenient)
        .with_context(|| format!("reading mass readings from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn standards_are_read_without_header() {
        let standards = standards_from_reader("0,0.002\n2, 0.091\n4,0.180\n".as_bytes(), false)
            .unwrap();
        assert_eq!(standards.len(), 3);
        assert_eq!(standards[1], StandardPoint::new(2.0, 0.091));
    }

    #[test]
    fn strict_mode_names_the_bad_cell() {
        let err = standards_from_reader("1,0.1\n2,abc\n".as_bytes(), false).unwrap_err();
        let engine_err = err.downcast_ref::<CalibrationError>().unwrap();
        assert_eq!(
            engine_err,
            &CalibrationError::InvalidInput {
                field: "absorbance".into(),
                index: 1,
                value: "abc".into(),
            }
        );
    }

    #[test]
    fn lenient_mode_reads_garbage_as_zero() {
        let standards = standards_from_reader("1,0.1\n2,abc\n".as_bytes(), true).unwrap();
        assert_eq!(standards[1].absorbance, 0.0);
    }

    #[test]
    fn samples_accept_labels_or_bare_absorbance() {
        let labelled = samples_from_reader("S1,0.25\nS2,0.30\n".as_bytes(), false).unwrap();
        assert_eq!(labelled[1], SampleMeasurement::new("S2", 0.30));

        let bare = samples_from_reader("0.25\n0.30\n".as_bytes(), false).unwrap();
        assert_eq!(bare[0], SampleMeasurement::new("Sample 1", 0.25));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let readings = mass_readings_from_reader("0.1,0.2\n\n0.2,0.4\n".as_bytes(), false).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1], MassReading::new(0.2, 0.4));
    }

    #[test]
    fn read_mass_readings_from_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"0.5,0.25\n1.0,0.51\n").unwrap();
        let path = temp.into_temp_path();
        let readings = read_mass_readings(&path, false).unwrap();
        assert_eq!(readings[0].mass, 0.5);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = read_standards(Path::new("does/not/exist.csv"), false).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.csv"));
    }
}
