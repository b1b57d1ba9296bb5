// File: src/services/pagination/paginator.rs
use crate::env_config::models::app_config::PaginationConfig;
use crate::error::ServiceError;
use crate::models::page::{Page, PageQuery};
use crate::services::generator::record_generator::{RecordOrder, SettingGenerator};
use std::sync::Arc;
use tracing::debug;

/// Shapes synthetic pages. There is no dataset behind the pages: `page_size`
/// decides how many records to fabricate and `total` is a nominal constant.
pub struct Paginator {
    generator: Arc<SettingGenerator>,
    nominal_total: u64,
    live_max_page_size: u64,
    historical_max_page_size: u64,
}

impl Paginator {
    pub fn new(generator: Arc<SettingGenerator>, config: &PaginationConfig) -> Self {
        Self {
            generator,
            nominal_total: config.nominal_total,
            live_max_page_size: config.live_max_page_size,
            historical_max_page_size: config.historical_max_page_size,
        }
    }

    pub fn live(&self, query: PageQuery) -> Result<Page, ServiceError> {
        self.paginate(query, self.live_max_page_size, RecordOrder::AsGenerated)
    }

    /// Same envelope as `live`, newest record first.
    pub fn historical(&self, query: PageQuery) -> Result<Page, ServiceError> {
        self.paginate(query, self.historical_max_page_size, RecordOrder::Descending)
    }

    fn paginate(
        &self,
        query: PageQuery,
        max_page_size: u64,
        order: RecordOrder,
    ) -> Result<Page, ServiceError> {
        let (page, page_size) = validate(query, max_page_size)?;
        debug!("Generating page {} of size {} ({:?})", page, page_size, order);

        let data = self.generator.generate_many(page_size as usize, order);

        Ok(Page {
            data,
            total: self.nominal_total,
            page,
            page_size,
            has_next: page.saturating_mul(page_size) < self.nominal_total,
        })
    }
}

fn validate(query: PageQuery, max_page_size: u64) -> Result<(u64, u64), ServiceError> {
    if query.page < 1 {
        return Err(ServiceError::invalid_parameter(
            "page",
            format!("must be at least 1, got {}", query.page),
        ));
    }

    let max = i64::try_from(max_page_size).unwrap_or(i64::MAX);
    if query.page_size < 1 || query.page_size > max {
        return Err(ServiceError::invalid_parameter(
            "page_size",
            format!("must be between 1 and {}, got {}", max_page_size, query.page_size),
        ));
    }

    Ok((query.page as u64, query.page_size as u64))
}
