use serde::Serialize;

/// Uniform response envelope shared by every endpoint. Absent members are
/// omitted from the JSON body rather than serialized as null.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
            errors: None,
        }
    }

    pub fn with_message(data: T, message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Self::data(data)
        }
    }

    pub fn page(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::data(data)
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
            pagination: None,
            errors: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            ..Self::message(message)
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            errors: Some(errors),
            ..Self::error("Validation error")
        }
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };

        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}
