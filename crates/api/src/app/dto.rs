use serde::Deserialize;

// -------------------------
// Flash notices
// -------------------------

/// One-shot status message carried across a redirect as `?notice=<code>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Notice {
    Created,
    Updated,
    Deleted,
    NotFound,
}

impl Notice {
    pub fn code(self) -> &'static str {
        match self {
            Notice::Created => "created",
            Notice::Updated => "updated",
            Notice::Deleted => "deleted",
            Notice::NotFound => "not_found",
        }
    }

    /// Unknown codes are dropped rather than rejected.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "created" => Some(Notice::Created),
            "updated" => Some(Notice::Updated),
            "deleted" => Some(Notice::Deleted),
            "not_found" => Some(Notice::NotFound),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::Created => "Item added.",
            Notice::Updated => "Item updated.",
            Notice::Deleted => "Item deleted.",
            Notice::NotFound => "Item not found.",
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, Notice::NotFound)
    }

    /// Where to send the browser after a mutation.
    pub fn redirect_target(self) -> String {
        format!("/?notice={}", self.code())
    }
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub notice: Option<String>,
}

impl ListQuery {
    pub fn notice(&self) -> Option<Notice> {
        self.notice.as_deref().and_then(Notice::from_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for notice in [Notice::Created, Notice::Updated, Notice::Deleted, Notice::NotFound] {
            assert_eq!(Notice::from_code(notice.code()), Some(notice));
        }
        assert_eq!(Notice::from_code("<script>"), None);
    }

    #[test]
    fn redirect_target_points_at_list() {
        assert_eq!(Notice::NotFound.redirect_target(), "/?notice=not_found");
    }
}
