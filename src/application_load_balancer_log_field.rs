use std::fmt;
use std::result;
use std::str::FromStr;

//Reference: https://docs.aws.amazon.com/elasticloadbalancing/latest/application/load-balancer-access-logs.html
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum ApplicationLoadBalancerLogField {
    Type = 0,
    Timestamp = 1,
    Elb = 2,
    ClientAndPort = 3,
    TargetAndPort = 4,
    RequestProcessingTime = 5,
    TargetProcessingTime = 6,
    ResponseProcessingTime = 7,
    ELBStatusCode = 8,
    TargetStatusCode = 9,
    ReceivedBytes = 10,
    SentBytes = 11,
    Request = 12,
    UserAgent = 13,
    SSLCipher = 14,
    SSLProtocol = 15,
    TargetGroupArn = 16,
    TraceId = 17,
    DomainName = 18,
    ChosenCertArn = 19,
}

pub const NUM_OF_FIELDS: i32 = 20;

impl fmt::Display for ApplicationLoadBalancerLogField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplicationLoadBalancerLogField::Type => "type",
            ApplicationLoadBalancerLogField::Timestamp => "timestamp",
            ApplicationLoadBalancerLogField::Elb => "elb",
            ApplicationLoadBalancerLogField::ClientAndPort => "client_and_port",
            ApplicationLoadBalancerLogField::TargetAndPort => "target_and_port",
            ApplicationLoadBalancerLogField::RequestProcessingTime => "request_processing_time",
            ApplicationLoadBalancerLogField::TargetProcessingTime => "target_processing_time",
            ApplicationLoadBalancerLogField::ResponseProcessingTime => "response_processing_time",
            ApplicationLoadBalancerLogField::ELBStatusCode => "elb_status_code",
            ApplicationLoadBalancerLogField::TargetStatusCode => "target_status_code",
            ApplicationLoadBalancerLogField::ReceivedBytes => "received_bytes",
            ApplicationLoadBalancerLogField::SentBytes => "sent_bytes",
            ApplicationLoadBalancerLogField::Request => "request",
            ApplicationLoadBalancerLogField::UserAgent => "user_agent",
            ApplicationLoadBalancerLogField::SSLCipher => "ssl_cipher",
            ApplicationLoadBalancerLogField::SSLProtocol => "ssl_protocol",
            ApplicationLoadBalancerLogField::TargetGroupArn => "target_group_arn",
            ApplicationLoadBalancerLogField::TraceId => "trace_id",
            ApplicationLoadBalancerLogField::DomainName => "domain_name",
            ApplicationLoadBalancerLogField::ChosenCertArn => "chosen_cert_arn",
        };

        write!(f, "{}", name)
    }
}

impl FromStr for ApplicationLoadBalancerLogField {
    type Err = String;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        match s {
            "type" => Ok(ApplicationLoadBalancerLogField::Type),
            "timestamp" => Ok(ApplicationLoadBalancerLogField::Timestamp),
            "elb" => Ok(ApplicationLoadBalancerLogField::Elb),
            "client_and_port" => Ok(ApplicationLoadBalancerLogField::ClientAndPort),
            "target_and_port" => Ok(ApplicationLoadBalancerLogField::TargetAndPort),
            "request_processing_time" => Ok(ApplicationLoadBalancerLogField::RequestProcessingTime),
            "target_processing_time" => Ok(ApplicationLoadBalancerLogField::TargetProcessingTime),
            "response_processing_time" => Ok(ApplicationLoadBalancerLogField::ResponseProcessingTime),
            "elb_status_code" => Ok(ApplicationLoadBalancerLogField::ELBStatusCode),
            "target_status_code" => Ok(ApplicationLoadBalancerLogField::TargetStatusCode),
            "received_bytes" => Ok(ApplicationLoadBalancerLogField::ReceivedBytes),
            "sent_bytes" => Ok(ApplicationLoadBalancerLogField::SentBytes),
            "request" => Ok(ApplicationLoadBalancerLogField::Request),
            "user_agent" => Ok(ApplicationLoadBalancerLogField::UserAgent),
            "ssl_cipher" => Ok(ApplicationLoadBalancerLogField::SSLCipher),
            "ssl_protocol" => Ok(ApplicationLoadBalancerLogField::SSLProtocol),
            "target_group_arn" => Ok(ApplicationLoadBalancerLogField::TargetGroupArn),
            "trace_id" => Ok(ApplicationLoadBalancerLogField::TraceId),
            "domain_name" => Ok(ApplicationLoadBalancerLogField::DomainName),
            "chosen_cert_arn" => Ok(ApplicationLoadBalancerLogField::ChosenCertArn),
            _ => Err("unknown column name".to_string()),
        }
    }
}

impl ApplicationLoadBalancerLogField {
    pub fn from_i32(i: i32) -> result::Result<Self, String> {
        match i {
            0 => Ok(ApplicationLoadBalancerLogField::Type),
            1 => Ok(ApplicationLoadBalancerLogField::Timestamp),
            2 => Ok(ApplicationLoadBalancerLogField::Elb),
            3 => Ok(ApplicationLoadBalancerLogField::ClientAndPort),
            4 => Ok(ApplicationLoadBalancerLogField::TargetAndPort),
            5 => Ok(ApplicationLoadBalancerLogField::RequestProcessingTime),
            6 => Ok(ApplicationLoadBalancerLogField::TargetProcessingTime),
            7 => Ok(ApplicationLoadBalancerLogField::ResponseProcessingTime),
            8 => Ok(ApplicationLoadBalancerLogField::ELBStatusCode),
            9 => Ok(ApplicationLoadBalancerLogField::TargetStatusCode),
            10 => Ok(ApplicationLoadBalancerLogField::ReceivedBytes),
            11 => Ok(ApplicationLoadBalancerLogField::SentBytes),
            12 => Ok(ApplicationLoadBalancerLogField::Request),
            13 => Ok(ApplicationLoadBalancerLogField::UserAgent),
            14 => Ok(ApplicationLoadBalancerLogField::SSLCipher),
            15 => Ok(ApplicationLoadBalancerLogField::SSLProtocol),
            16 => Ok(ApplicationLoadBalancerLogField::TargetGroupArn),
            17 => Ok(ApplicationLoadBalancerLogField::TraceId),
            18 => Ok(ApplicationLoadBalancerLogField::DomainName),
            19 => Ok(ApplicationLoadBalancerLogField::ChosenCertArn),
            _ => Err("unknown column index".to_string()),
        }
    }

    /// All columns in the order they appear on a log line.
    pub fn all() -> Vec<ApplicationLoadBalancerLogField> {
        (0..NUM_OF_FIELDS)
            .filter_map(|i| ApplicationLoadBalancerLogField::from_i32(i).ok())
            .collect()
    }

    pub fn field_names() -> Vec<String> {
        ApplicationLoadBalancerLogField::all()
            .into_iter()
            .map(|f| f.to_string())
            .collect()
    }
}
