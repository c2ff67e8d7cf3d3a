use crate::application_load_balancer_log_field::ApplicationLoadBalancerLogField as Field;
use crate::common::types::{self, Bytes, LogEntry, ProcessingTime, RequestType, StatusCodes};
use chrono::DateTime;
use std::num::{ParseFloatError, ParseIntError};
use std::result;

pub type ParseResult<T> = result::Result<T, ParseFailure>;

type ScanResult<T> = result::Result<T, ParseErrorKind>;

#[derive(Fail, PartialEq, Eq, Clone, Debug)]
pub enum ParseErrorKind {
    #[fail(display = "Unexpected End Of Line")]
    UnexpectedEndOfLine,
    #[fail(display = "Unterminated Quote")]
    UnterminatedQuote,
    #[fail(display = "Unknown Request Type \"{}\"", _0)]
    UnknownRequestType(String),
    #[fail(display = "{}", _0)]
    Timestamp(#[cause] chrono::ParseError),
    #[fail(display = "{}", _0)]
    Host(#[cause] types::ParseHostError),
    #[fail(display = "{}", _0)]
    Float(#[cause] ParseFloatError),
    #[fail(display = "{}", _0)]
    Int(#[cause] ParseIntError),
    #[fail(display = "{}", _0)]
    Request(#[cause] types::ParseRequestError),
}

impl From<chrono::ParseError> for ParseErrorKind {
    fn from(err: chrono::ParseError) -> ParseErrorKind {
        ParseErrorKind::Timestamp(err)
    }
}

impl From<types::ParseHostError> for ParseErrorKind {
    fn from(err: types::ParseHostError) -> ParseErrorKind {
        ParseErrorKind::Host(err)
    }
}

impl From<ParseFloatError> for ParseErrorKind {
    fn from(err: ParseFloatError) -> ParseErrorKind {
        ParseErrorKind::Float(err)
    }
}

impl From<ParseIntError> for ParseErrorKind {
    fn from(err: ParseIntError) -> ParseErrorKind {
        ParseErrorKind::Int(err)
    }
}

impl From<types::ParseRequestError> for ParseErrorKind {
    fn from(err: types::ParseRequestError) -> ParseErrorKind {
        ParseErrorKind::Request(err)
    }
}

/// A line that could not be turned into a `LogEntry`. `field` is the column
/// the scan was reading when it gave up.
#[derive(Fail, PartialEq, Eq, Clone, Debug)]
#[fail(display = "failed to parse {}: {}", field, kind)]
pub struct ParseFailure {
    pub line: String,
    pub field: Field,
    #[cause]
    pub kind: ParseErrorKind,
}

/// How a target status code that is not a number is treated.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TargetStatusPolicy {
    /// Anything that is not an integer means no response reached the target.
    Lenient,
    /// Only the `-` placeholder means absent, other non-numeric tokens fail the line.
    PlaceholderOnly,
}

impl Default for TargetStatusPolicy {
    fn default() -> Self {
        TargetStatusPolicy::Lenient
    }
}

struct Cursor<'a> {
    line: &'a str,
    pos: usize,
    field: Field,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Cursor {
            line,
            pos: 0,
            field: Field::Type,
        }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn is_exhausted(&self) -> bool {
        self.pos >= self.line.len()
    }

    fn next_until(&mut self, delimiter: char) -> ScanResult<&'a str> {
        let rest = self.rest();
        let found = rest.find(delimiter).ok_or(ParseErrorKind::UnexpectedEndOfLine)?;
        self.pos += found + delimiter.len_utf8();
        Ok(&rest[..found])
    }

    fn next(&mut self, field: Field) -> ScanResult<&'a str> {
        self.field = field;
        self.next_until(' ')
    }

    fn next_quoted(&mut self, field: Field) -> ScanResult<&'a str> {
        self.field = field;

        let open = self.rest().find('"').ok_or(ParseErrorKind::UnexpectedEndOfLine)?;
        self.pos += open + 1;

        let token = self
            .next_until('"')
            .map_err(|_| ParseErrorKind::UnterminatedQuote)?;

        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
        Ok(token)
    }

    fn next_f64(&mut self, field: Field) -> ScanResult<f64> {
        Ok(self.next(field)?.parse::<f64>()?)
    }

    fn next_i32(&mut self, field: Field) -> ScanResult<i32> {
        Ok(self.next(field)?.parse::<i32>()?)
    }

    fn next_i64(&mut self, field: Field) -> ScanResult<i64> {
        Ok(self.next(field)?.parse::<i64>()?)
    }

    /// Runs `read` unless the line is already used up, in which case the
    /// fields it would have read are absent.
    fn optional<T, F>(&mut self, read: F) -> ScanResult<Option<T>>
    where
        F: FnOnce(&mut Self) -> ScanResult<T>,
    {
        if self.is_exhausted() {
            Ok(None)
        } else {
            read(self).map(Some)
        }
    }
}

fn placeholder_to_none(s: &str) -> Option<String> {
    if s == "-" {
        None
    } else {
        Some(s.to_string())
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct LineParser {
    target_status_policy: TargetStatusPolicy,
}

impl LineParser {
    pub fn new() -> Self {
        LineParser::default()
    }

    pub fn target_status_policy(mut self, policy: TargetStatusPolicy) -> Self {
        self.target_status_policy = policy;
        self
    }

    pub fn parse(&self, line: &str) -> ParseResult<LogEntry> {
        let mut cursor = Cursor::new(line);
        let result = self.read_entry(&mut cursor);

        result.map_err(|kind| ParseFailure {
            line: line.to_string(),
            field: cursor.field,
            kind,
        })
    }

    fn read_target_status(&self, cursor: &mut Cursor<'_>) -> ScanResult<Option<i32>> {
        let token = cursor.next(Field::TargetStatusCode)?;

        match self.target_status_policy {
            TargetStatusPolicy::Lenient => Ok(token.parse::<i32>().ok()),
            TargetStatusPolicy::PlaceholderOnly => {
                if token == "-" {
                    Ok(None)
                } else {
                    Ok(Some(token.parse::<i32>()?))
                }
            }
        }
    }

    fn read_entry(&self, cursor: &mut Cursor<'_>) -> ScanResult<LogEntry> {
        let request_type = cursor
            .next(Field::Type)?
            .parse::<RequestType>()
            .map_err(ParseErrorKind::UnknownRequestType)?;
        let timestamp = DateTime::parse_from_rfc3339(cursor.next(Field::Timestamp)?)?;
        let load_balancer_id = cursor.next(Field::Elb)?.to_string();
        let client_endpoint = types::parse_host(cursor.next(Field::ClientAndPort)?)?;
        let target_endpoint = types::parse_optional_host(cursor.next(Field::TargetAndPort)?)?;

        let processing_time = ProcessingTime {
            request: cursor.next_f64(Field::RequestProcessingTime)?,
            target: cursor.next_f64(Field::TargetProcessingTime)?,
            response: cursor.next_f64(Field::ResponseProcessingTime)?,
        };

        let status_codes = StatusCodes {
            elb: cursor.next_i32(Field::ELBStatusCode)?,
            target: self.read_target_status(cursor)?,
        };

        let bytes = Bytes {
            received: cursor.next_i64(Field::ReceivedBytes)?,
            sent: cursor.next_i64(Field::SentBytes)?,
        };

        let request = types::parse_request(cursor.next_quoted(Field::Request)?)?;
        let user_agent = cursor.next_quoted(Field::UserAgent)?.to_string();
        let ssl_cipher = cursor.next(Field::SSLCipher)?.to_string();
        let ssl_protocol = cursor.next(Field::SSLProtocol)?.to_string();
        let target_group_id = cursor.next(Field::TargetGroupArn)?.to_string();
        let trace_id = cursor.next_quoted(Field::TraceId)?.to_string();

        // Lines written before these two columns existed simply end here.
        let suffix = cursor.optional(|c| {
            let domain_name = c.next_quoted(Field::DomainName)?;
            let chosen_cert_id = c.next_quoted(Field::ChosenCertArn)?;
            Ok((placeholder_to_none(domain_name), placeholder_to_none(chosen_cert_id)))
        })?;
        let (domain_name, chosen_cert_id) = suffix.unwrap_or((None, None));

        Ok(LogEntry {
            request_type,
            timestamp,
            load_balancer_id,
            client_endpoint,
            target_endpoint,
            processing_time,
            status_codes,
            bytes,
            request,
            user_agent,
            ssl_cipher,
            ssl_protocol,
            target_group_id,
            trace_id,
            domain_name,
            chosen_cert_id,
        })
    }
}

/// Parses one access log line with the default options.
pub fn parse(line: &str) -> ParseResult<LogEntry> {
    LineParser::default().parse(line)
}
