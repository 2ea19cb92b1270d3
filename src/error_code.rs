use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NoError,
    GetDataFailed,
    ValidationFailed,
    InvalidRequestBody,
    InvalidTrafficData,
}

impl ErrorCode {
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::NoError => 0,
            ErrorCode::GetDataFailed => 10000,
            ErrorCode::ValidationFailed => 10002,
            ErrorCode::InvalidRequestBody => 10003,
            ErrorCode::InvalidTrafficData => 10004,
        }
    }
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::NoError => "No error",
            ErrorCode::GetDataFailed => "Get data failed",
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidRequestBody => "Request body must be a JSON object",
            ErrorCode::InvalidTrafficData => "Invalid traffic data",
        }
    }
}

// 让 ErrorCode 序列化为整数
impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.code())
    }
}
