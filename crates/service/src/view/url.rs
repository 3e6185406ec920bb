/// Builds absolute links for application paths.
pub trait UrlGenerator: Send + Sync {
    fn to(&self, path: &str) -> String;
}

/// Prefixes paths with a configured base URL; an empty base keeps links root-relative.
#[derive(Debug, Clone, Default)]
pub struct BaseUrl {
    base: String,
}

impl BaseUrl {
    pub fn new(base: &str) -> Self {
        Self { base: base.trim_end_matches('/').to_string() }
    }
}

impl UrlGenerator for BaseUrl {
    fn to(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path_with_one_slash() {
        let urls = BaseUrl::new("https://billing.example.com/");
        assert_eq!(urls.to("/invoices/4/edit"), "https://billing.example.com/invoices/4/edit");
        assert_eq!(urls.to("vendors/2"), "https://billing.example.com/vendors/2");
    }

    #[test]
    fn empty_base_gives_root_relative_links() {
        assert_eq!(BaseUrl::new("").to("expenses/1/edit"), "/expenses/1/edit");
    }
}
