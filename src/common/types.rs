use crate::application_load_balancer_log_field::ApplicationLoadBalancerLogField;
use chrono::SecondsFormat;
use hashbrown::HashMap;
use ordered_float::OrderedFloat;
use regex::Regex;
use std::fmt;
use std::result;
use std::str::FromStr;

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(OrderedFloat<f64>),
    String(String),
    Null,
    DateTime(chrono::DateTime<chrono::offset::FixedOffset>),
    Host(Host),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl.into_inner()),
            Value::String(s) => f.write_str(s),
            Value::Null => f.write_str("-"),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Host(h) => write!(f, "{}", h),
        }
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum RequestType {
    Http,
    Https,
    H2,
    Ws,
    Wss,
}

lazy_static! {
    static ref REQUEST_TYPES: HashMap<&'static str, RequestType> = {
        let mut m = HashMap::new();
        m.insert("http", RequestType::Http);
        m.insert("https", RequestType::Https);
        m.insert("h2", RequestType::H2);
        m.insert("ws", RequestType::Ws);
        m.insert("wss", RequestType::Wss);
        m
    };
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        REQUEST_TYPES
            .get(s.to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RequestType::Http => "http",
            RequestType::Https => "https",
            RequestType::H2 => "h2",
            RequestType::Ws => "ws",
            RequestType::Wss => "wss",
        };

        f.write_str(name)
    }
}

pub type ParseHostResult<T> = result::Result<T, ParseHostError>;

#[derive(Fail, PartialEq, Eq, Clone, Debug)]
pub enum ParseHostError {
    #[fail(display = "Parse Host Error")]
    ParseHost,
    #[fail(display = "{}", _0)]
    ParsePort(#[cause] std::num::ParseIntError),
}

impl From<std::num::ParseIntError> for ParseHostError {
    fn from(err: std::num::ParseIntError) -> ParseHostError {
        ParseHostError::ParsePort(err)
    }
}

pub type Hostname = String;
pub type Port = u16;

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct Host {
    pub hostname: Hostname,
    pub port: Port,
}

impl fmt::Display for Host {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.hostname.contains(':') {
            write!(fmt, "[{}]:{}", self.hostname, self.port)
        } else {
            write!(fmt, "{}:{}", self.hostname, self.port)
        }
    }
}

lazy_static! {
    // The unbracketed alternative is greedy, so an IPv6 literal without brackets
    // splits on its last colon.
    static ref HOST_REGEX: Regex = Regex::new(r#"^(?:\[([^\[\]\s]+)\]|([^\[\]\s]+)):([0-9]+)$"#).unwrap();
}

pub fn parse_host(s: &str) -> ParseHostResult<Host> {
    if let Some(cap) = HOST_REGEX.captures(s) {
        let hostname = cap
            .get(1)
            .or_else(|| cap.get(2))
            .map_or("", |m| m.as_str())
            .to_string();
        let port: u16 = cap.get(3).map_or("", |m| m.as_str()).parse::<u16>()?;

        let host = Host { hostname, port };
        Ok(host)
    } else {
        Err(ParseHostError::ParseHost)
    }
}

/// Like `parse_host`, but the `-` placeholder means no endpoint was recorded.
pub fn parse_optional_host(s: &str) -> ParseHostResult<Option<Host>> {
    if s == "-" {
        Ok(None)
    } else {
        parse_host(s).map(Some)
    }
}

pub type ParseRequestResult<T> = result::Result<T, ParseRequestError>;

#[derive(Fail, PartialEq, Eq, Clone, Debug)]
pub enum ParseRequestError {
    #[fail(display = "expected 3 space separated tokens in request but got {}", _0)]
    TokenCount(usize),
}

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct Request {
    pub method: String,
    pub raw_url: String,
    pub protocol: String,
}

impl Request {
    /// Parses `raw_url` on demand. A bad url never fails the log line itself.
    pub fn url(&self) -> result::Result<url::Url, url::ParseError> {
        url::Url::parse(&self.raw_url)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&*self.method)?;
        fmt.write_str(" ")?;
        fmt.write_str(&*self.raw_url)?;
        fmt.write_str(" ")?;
        fmt.write_str(&*self.protocol)?;
        Ok(())
    }
}

pub fn parse_request(s: &str) -> ParseRequestResult<Request> {
    let parts: Vec<&str> = s.split(' ').collect();

    if let [method, raw_url, protocol] = parts.as_slice() {
        Ok(Request {
            method: method.to_string(),
            raw_url: raw_url.to_string(),
            protocol: protocol.to_string(),
        })
    } else {
        Err(ParseRequestError::TokenCount(parts.len()))
    }
}

/// Seconds spent in each leg of the request. `-1` means the leg was not measured
/// and is kept as is.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct ProcessingTime {
    pub request: f64,
    pub target: f64,
    pub response: f64,
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StatusCodes {
    pub elb: i32,
    pub target: Option<i32>,
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Bytes {
    pub received: i64,
    pub sent: i64,
}

#[derive(PartialEq, Clone, Debug)]
pub struct LogEntry {
    pub request_type: RequestType,
    pub timestamp: chrono::DateTime<chrono::offset::FixedOffset>,
    pub load_balancer_id: String,
    pub client_endpoint: Host,
    /// `None` when the request never reached a target.
    pub target_endpoint: Option<Host>,
    pub processing_time: ProcessingTime,
    pub status_codes: StatusCodes,
    pub bytes: Bytes,
    pub request: Request,
    pub user_agent: String,
    pub ssl_cipher: String,
    pub ssl_protocol: String,
    pub target_group_id: String,
    pub trace_id: String,
    pub domain_name: Option<String>,
    pub chosen_cert_id: Option<String>,
}

fn opt_string_value(s: &Option<String>) -> Value {
    match s {
        Some(s) => Value::String(s.clone()),
        None => Value::Null,
    }
}

impl LogEntry {
    pub fn get(&self, field: ApplicationLoadBalancerLogField) -> Value {
        use crate::application_load_balancer_log_field::ApplicationLoadBalancerLogField as F;

        match field {
            F::Type => Value::String(self.request_type.to_string()),
            F::Timestamp => Value::DateTime(self.timestamp),
            F::Elb => Value::String(self.load_balancer_id.clone()),
            F::ClientAndPort => Value::Host(self.client_endpoint.clone()),
            F::TargetAndPort => self
                .target_endpoint
                .clone()
                .map_or(Value::Null, Value::Host),
            F::RequestProcessingTime => Value::Float(OrderedFloat(self.processing_time.request)),
            F::TargetProcessingTime => Value::Float(OrderedFloat(self.processing_time.target)),
            F::ResponseProcessingTime => Value::Float(OrderedFloat(self.processing_time.response)),
            F::ELBStatusCode => Value::Int(i64::from(self.status_codes.elb)),
            F::TargetStatusCode => self
                .status_codes
                .target
                .map_or(Value::Null, |s| Value::Int(i64::from(s))),
            F::ReceivedBytes => Value::Int(self.bytes.received),
            F::SentBytes => Value::Int(self.bytes.sent),
            F::Request => Value::String(self.request.to_string()),
            F::UserAgent => Value::String(self.user_agent.clone()),
            F::SSLCipher => Value::String(self.ssl_cipher.clone()),
            F::SSLProtocol => Value::String(self.ssl_protocol.clone()),
            F::TargetGroupArn => Value::String(self.target_group_id.clone()),
            F::TraceId => Value::String(self.trace_id.clone()),
            F::DomainName => opt_string_value(&self.domain_name),
            F::ChosenCertArn => opt_string_value(&self.chosen_cert_id),
        }
    }

    pub fn to_tuples(&self) -> Vec<(String, Value)> {
        ApplicationLoadBalancerLogField::all()
            .into_iter()
            .map(|field| (field.to_string(), self.get(field)))
            .collect()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let target_status = match self.status_codes.target {
            Some(status) => status.to_string(),
            None => "-".to_string(),
        };
        let target_endpoint = match &self.target_endpoint {
            Some(host) => host.to_string(),
            None => "-".to_string(),
        };

        write!(
            f,
            "{} {} {} {} {} {} {} {} {} {} {} {} \"{}\" \"{}\" {} {} {} \"{}\"",
            self.request_type,
            self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.load_balancer_id,
            self.client_endpoint,
            target_endpoint,
            self.processing_time.request,
            self.processing_time.target,
            self.processing_time.response,
            self.status_codes.elb,
            target_status,
            self.bytes.received,
            self.bytes.sent,
            self.request,
            self.user_agent,
            self.ssl_cipher,
            self.ssl_protocol,
            self.target_group_id,
            self.trace_id
        )?;

        if self.domain_name.is_some() || self.chosen_cert_id.is_some() {
            write!(
                f,
                " \"{}\" \"{}\"",
                self.domain_name.as_deref().unwrap_or("-"),
                self.chosen_cert_id.as_deref().unwrap_or("-")
            )?;
        }

        Ok(())
    }
}
