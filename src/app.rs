use alblog::{ApplicationLoadBalancerLogField, LogEntry, ReadSummary, Reader, ReaderBuilder, ReaderError, TargetStatusPolicy, Value};
use csv::Writer;
use prettytable::{Cell, Row, Table};
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::result;
use std::str::FromStr;

pub(crate) type AppResult<T> = result::Result<T, AppError>;

#[derive(Fail, Debug)]
pub(crate) enum AppError {
    #[fail(display = "{}", _0)]
    Reader(#[cause] ReaderError),
    #[fail(display = "Unknown Field \"{}\"", _0)]
    UnknownField(String),
    #[fail(display = "{}", _0)]
    WriteCsv(#[cause] csv::Error),
    #[fail(display = "{}", _0)]
    WriteJson(#[cause] json::Error),
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
}

impl From<ReaderError> for AppError {
    fn from(err: ReaderError) -> AppError {
        AppError::Reader(err)
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> AppError {
        AppError::WriteCsv(err)
    }
}

impl From<json::Error> for AppError {
    fn from(err: json::Error) -> AppError {
        AppError::WriteJson(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> AppError {
        AppError::Io(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DataSource {
    File(PathBuf),
    Stdin,
}

impl DataSource {
    pub(crate) fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => DataSource::Stdin,
            Some(path) => DataSource::File(PathBuf::from(path)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    Table,
    Csv,
    Json,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputMode::Table),
            "csv" => Ok(OutputMode::Csv),
            "json" => Ok(OutputMode::Json),
            _ => Err("unknown output mode".to_string()),
        }
    }
}

pub(crate) fn parse_field_list(s: &str) -> AppResult<Vec<ApplicationLoadBalancerLogField>> {
    s.split(',')
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<ApplicationLoadBalancerLogField>()
                .map_err(|_| AppError::UnknownField(name.to_string()))
        })
        .collect()
}

fn open(data_source: &DataSource, policy: TargetStatusPolicy) -> AppResult<Reader<Box<dyn io::Read>>> {
    let rdr: Box<dyn io::Read> = match data_source {
        DataSource::File(path) => Box::new(File::open(path)?),
        DataSource::Stdin => Box::new(io::stdin()),
    };

    let mut builder = ReaderBuilder::new();
    builder.target_status_policy(policy);
    Ok(builder.from_reader(rdr))
}

fn to_row(entry: &LogEntry, fields: &[ApplicationLoadBalancerLogField]) -> Row {
    Row::new(
        fields
            .iter()
            .map(|field| Cell::new(&*entry.get(*field).to_string()))
            .collect(),
    )
}

fn to_csv_record(entry: &LogEntry, fields: &[ApplicationLoadBalancerLogField]) -> Vec<String> {
    fields.iter().map(|field| entry.get(*field).to_string()).collect()
}

fn to_json_value(val: Value) -> json::JsonValue {
    match val {
        Value::DateTime(_) | Value::Host(_) => val.to_string().into(),
        Value::Float(f) => f.into_inner().into(),
        Value::Int(i) => i.into(),
        Value::Null => json::Null,
        Value::String(s) => s.into(),
    }
}

pub(crate) fn run<W: io::Write>(
    data_source: &DataSource,
    fields: &[ApplicationLoadBalancerLogField],
    output_mode: OutputMode,
    policy: TargetStatusPolicy,
    out: &mut W,
) -> AppResult<ReadSummary> {
    let mut rdr = open(data_source, policy)?;
    let header: Vec<String> = fields.iter().map(|field| field.to_string()).collect();

    let summary = match output_mode {
        OutputMode::Table => {
            let mut table = Table::new();
            table.set_titles(Row::new(header.iter().map(|name| Cell::new(&*name)).collect()));
            let summary = rdr.for_each_entry(|entry| {
                table.add_row(to_row(&entry, fields));
            })?;
            table.print(out)?;
            summary
        }
        OutputMode::Csv => {
            let mut wtr = Writer::from_writer(out);
            wtr.write_record(&header)?;

            let mut write_error: Option<csv::Error> = None;
            let summary = rdr.for_each_entry(|entry| {
                if write_error.is_none() {
                    write_error = wtr.write_record(to_csv_record(&entry, fields)).err();
                }
            })?;

            if let Some(err) = write_error {
                return Err(AppError::WriteCsv(err));
            }
            wtr.flush()?;
            summary
        }
        OutputMode::Json => {
            let mut data = json::JsonValue::new_array();
            let mut write_error: Option<json::Error> = None;
            let summary = rdr.for_each_entry(|entry| {
                let mut obj = json::JsonValue::new_object();
                for field in fields {
                    obj[field.to_string()] = to_json_value(entry.get(*field));
                }

                if write_error.is_none() {
                    write_error = data.push(obj).err();
                }
            })?;

            if let Some(err) = write_error {
                return Err(AppError::WriteJson(err));
            }
            writeln!(out, "{}", data.dump())?;
            summary
        }
    };

    Ok(summary)
}

pub(crate) fn check(data_source: &DataSource, policy: TargetStatusPolicy) -> AppResult<ReadSummary> {
    let mut rdr = open(data_source, policy)?;
    let summary = rdr.for_each_entry(|_| ())?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alblog::ApplicationLoadBalancerLogField as Field;
    use tempfile::{tempdir, TempDir};

    const LINE: &str = r#"https 2017-12-13T12:00:00.257585Z app/myservice-prod-alb/111b8011115962e 22.222.111.11:14485 11.22.3.222:32777 0.001 0.010 0.000 200 200 407 698 "GET https://account.example.com:443/path HTTP/1.1" "-" ECDHE-RSA-AES128-GCM-SHA256 TLSv1.2 arn:aws:elasticloadbalancing:eu-west-1:1:targetgroup/x/y "Root=1-5a311111-21111a720161096a2222faff" "account.example.com" "arn:aws:acm:eu-west-1:1:certificate/z""#;

    fn write_log(lines: &[&str]) -> (TempDir, DataSource) {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("alb_for_test.log");
        let mut file = File::create(file_path.clone()).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.sync_all().unwrap();

        (dir, DataSource::File(file_path))
    }

    #[test]
    fn test_parse_field_list() {
        let fields = parse_field_list("timestamp, elb_status_code,,target_status_code").unwrap();
        assert_eq!(
            vec![Field::Timestamp, Field::ELBStatusCode, Field::TargetStatusCode],
            fields
        );

        let result = parse_field_list("timestamp,backend_and_port");
        assert!(matches!(result, Err(AppError::UnknownField(ref name)) if name == "backend_and_port"));
    }

    #[test]
    fn test_data_source_from_arg() {
        assert_eq!(DataSource::Stdin, DataSource::from_arg(None));
        assert_eq!(DataSource::Stdin, DataSource::from_arg(Some("-")));
        assert_eq!(
            DataSource::File(PathBuf::from("access.log")),
            DataSource::from_arg(Some("access.log"))
        );
    }

    #[test]
    fn test_run_csv_mode() {
        let missing_target = LINE.replace(" 200 200 ", " 504 - ");
        let (dir, data_source) = write_log(&[LINE, "garbage", missing_target.as_str()]);

        let mut out = Vec::new();
        let fields = vec![Field::Type, Field::ELBStatusCode, Field::TargetStatusCode, Field::ClientAndPort];
        let summary = run(&data_source, &fields, OutputMode::Csv, TargetStatusPolicy::Lenient, &mut out).unwrap();

        assert_eq!(ReadSummary { parsed: 2, failed: 1 }, summary);
        let expected = "type,elb_status_code,target_status_code,client_and_port\n\
                        https,200,200,22.222.111.11:14485\n\
                        https,504,-,22.222.111.11:14485\n";
        assert_eq!(expected, String::from_utf8(out).unwrap());

        dir.close().unwrap();
    }

    #[test]
    fn test_run_json_mode() {
        let legacy_end = LINE.find(r#" "account.example.com""#).unwrap();
        let (dir, data_source) = write_log(&[LINE, &LINE[..legacy_end]]);

        let mut out = Vec::new();
        let fields = ApplicationLoadBalancerLogField::all();
        let summary = run(&data_source, &fields, OutputMode::Json, TargetStatusPolicy::Lenient, &mut out).unwrap();
        assert_eq!(ReadSummary { parsed: 2, failed: 0 }, summary);

        let data = json::parse(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(2, data.len());
        assert_eq!(Some(698), data[0]["sent_bytes"].as_u64());
        let request_processing_time = data[0]["request_processing_time"].as_f64().unwrap();
        assert!((request_processing_time - 0.001).abs() < 1e-9);
        assert_eq!(Some("account.example.com"), data[0]["domain_name"].as_str());
        assert_eq!(Some("2017-12-13T12:00:00.257585Z"), data[0]["timestamp"].as_str());
        assert!(data[1]["domain_name"].is_null());
        assert!(data[1]["chosen_cert_arn"].is_null());

        dir.close().unwrap();
    }

    #[test]
    fn test_run_without_target() {
        let no_target = LINE.replace(" 11.22.3.222:32777 0.001 0.010 0.000 200 200 ", " - -1 -1 -1 503 - ");
        let (dir, data_source) = write_log(&[no_target.as_str()]);
        let fields = vec![Field::TargetAndPort, Field::ELBStatusCode];

        let mut out = Vec::new();
        run(&data_source, &fields, OutputMode::Csv, TargetStatusPolicy::Lenient, &mut out).unwrap();
        assert_eq!("target_and_port,elb_status_code\n-,503\n", String::from_utf8(out).unwrap());

        let mut out = Vec::new();
        run(&data_source, &fields, OutputMode::Json, TargetStatusPolicy::Lenient, &mut out).unwrap();
        let data = json::parse(&String::from_utf8(out).unwrap()).unwrap();
        assert!(data[0]["target_and_port"].is_null());
        assert_eq!(Some(503), data[0]["elb_status_code"].as_i32());

        dir.close().unwrap();
    }

    #[test]
    fn test_run_table_mode() {
        let (dir, data_source) = write_log(&[LINE]);

        let mut out = Vec::new();
        let fields = vec![Field::DomainName, Field::SentBytes];
        let summary = run(&data_source, &fields, OutputMode::Table, TargetStatusPolicy::Lenient, &mut out).unwrap();
        assert_eq!(ReadSummary { parsed: 1, failed: 0 }, summary);

        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("domain_name"));
        assert!(rendered.contains("account.example.com"));
        assert!(rendered.contains("698"));

        dir.close().unwrap();
    }

    #[test]
    fn test_check_mode() {
        let odd_target = LINE.replace(" 200 200 ", " 200 ??? ");
        let (dir, data_source) = write_log(&[LINE, "", odd_target.as_str()]);

        let summary = check(&data_source, TargetStatusPolicy::Lenient).unwrap();
        assert_eq!(ReadSummary { parsed: 2, failed: 1 }, summary);

        let summary = check(&data_source, TargetStatusPolicy::PlaceholderOnly).unwrap();
        assert_eq!(ReadSummary { parsed: 1, failed: 2 }, summary);

        dir.close().unwrap();
    }

    #[test]
    fn test_check_missing_file() {
        let dir = tempdir().unwrap();
        let data_source = DataSource::File(dir.path().join("missing.log"));
        let result = check(&data_source, TargetStatusPolicy::Lenient);
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
