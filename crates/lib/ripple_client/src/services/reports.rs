//! User-to-user reporting.

use std::sync::Arc;

use async_trait::async_trait;

use ripple_core::models::{CreateReportRequest, PageSlice, ReportResponse, SpringPage};
use ripple_core::validation;

use crate::collections::{PageFetcher, PagedCollection};
use crate::error::ApiResult;
use crate::transport::Transport;

#[derive(Clone)]
pub struct ReportService {
    transport: Transport,
}

impl ReportService {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// File a report. The description is screened client-side first.
    pub async fn create(&self, request: &CreateReportRequest) -> ApiResult<ReportResponse> {
        validation::validate_report_description(&request.description)?;
        self.transport.post("/api/reports", request).await
    }

    /// The reporter's own submissions, newest first.
    pub fn my_reports(&self, page_size: u32) -> PagedCollection<ReportResponse> {
        PagedCollection::new(
            page_size,
            Arc::new(MyReportsFetcher {
                transport: self.transport.clone(),
            }),
        )
    }
}

struct MyReportsFetcher {
    transport: Transport,
}

#[async_trait]
impl PageFetcher<ReportResponse> for MyReportsFetcher {
    async fn fetch(&self, page: u32, size: u32) -> ApiResult<PageSlice<ReportResponse>> {
        let response: SpringPage<ReportResponse> = self
            .transport
            .get(
                "/api/reports/my-reports",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await?;
        Ok(response.into())
    }
}
