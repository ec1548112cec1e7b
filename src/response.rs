use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
    pub total_pages: Option<i64>,
    pub has_next_page: Option<bool>,
    pub has_prev_page: Option<bool>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
            total_pages: Some(total_pages),
            has_next_page: Some(page < total_pages),
            has_prev_page: Some(page > 1),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
            total_pages: None,
            has_next_page: None,
            has_prev_page: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_derives_total_pages_with_remainder() {
        let meta = Meta::new(1, 12, 25);
        assert_eq!(meta.total_pages, Some(3));
        assert_eq!(meta.has_next_page, Some(true));
        assert_eq!(meta.has_prev_page, Some(false));
    }

    #[test]
    fn meta_last_page_has_no_next() {
        let meta = Meta::new(3, 12, 25);
        assert_eq!(meta.has_next_page, Some(false));
        assert_eq!(meta.has_prev_page, Some(true));
    }

    #[test]
    fn meta_exact_multiple() {
        let meta = Meta::new(2, 10, 20);
        assert_eq!(meta.total_pages, Some(2));
        assert_eq!(meta.has_next_page, Some(false));
    }

    #[test]
    fn meta_empty_collection() {
        let meta = Meta::new(1, 10, 0);
        assert_eq!(meta.total_pages, Some(0));
        assert_eq!(meta.has_next_page, Some(false));
        assert_eq!(meta.has_prev_page, Some(false));
    }
}
