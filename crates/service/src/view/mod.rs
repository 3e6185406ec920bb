//! Presentation helpers injected into the datatable renderers: links,
//! translations, money and dates.

pub mod date;
pub mod html;
pub mod i18n;
pub mod money;
pub mod url;

use std::sync::Arc;

pub use date::DateFormatter;
pub use i18n::{EnglishTranslator, Translator};
pub use money::{CurrencyFormatter, MoneyFormatter};
pub use url::{BaseUrl, UrlGenerator};

/// Everything a column or action needs to turn a row into HTML.
#[derive(Clone)]
pub struct ViewContext {
    pub urls: Arc<dyn UrlGenerator>,
    pub translator: Arc<dyn Translator>,
    pub money: Arc<dyn MoneyFormatter>,
    pub dates: DateFormatter,
}

impl ViewContext {
    pub fn new(
        urls: Arc<dyn UrlGenerator>,
        translator: Arc<dyn Translator>,
        money: Arc<dyn MoneyFormatter>,
        dates: DateFormatter,
    ) -> Self {
        Self { urls, translator, money, dates }
    }

    /// English labels and the built-in currency table.
    pub fn with_defaults(base_url: &str, date_format: &str) -> Self {
        Self::new(
            Arc::new(BaseUrl::new(base_url)),
            Arc::new(EnglishTranslator),
            Arc::new(CurrencyFormatter::default()),
            DateFormatter::new(date_format),
        )
    }

    pub fn trans(&self, key: &str) -> String {
        self.translator.trans(key)
    }
}
