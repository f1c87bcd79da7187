//! `RAD/ingestor/timeline`: ingestor timeline by desk and business date.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_json::Value;

use crate::context_event;
use crate::dispatch::ExecutionContext;
use crate::tools::{
    to_payload, ParamDef, ParamType, Params, Tool, ToolError, ToolMetadata, ToolResult,
};

pub const TIMELINE_DESKS: [&str; 5] = ["Options", "Exotics", "Inflation", "LDFX", "FXG"];

/// Records produced per query by [`MockTimelineSource`].
const MOCK_RECORDS: i64 = 10;

/// One ingestor load event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineRecord {
    #[serde(rename = "TS")]
    pub ts: NaiveDateTime,
    #[serde(rename = "COB")]
    pub cob: NaiveDate,
    pub data: String,
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub earliest: Option<NaiveDateTime>,
    pub latest: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineSummary {
    pub total_records: usize,
    pub overwrite_count: usize,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineReport {
    pub records: Vec<TimelineRecord>,
    pub summary: TimelineSummary,
}

impl TimelineReport {
    pub fn from_records(records: Vec<TimelineRecord>) -> Self {
        let summary = TimelineSummary {
            total_records: records.len(),
            overwrite_count: records.iter().filter(|r| r.overwrite).count(),
            date_range: DateRange {
                earliest: records.iter().map(|r| r.ts).min(),
                latest: records.iter().map(|r| r.ts).max(),
            },
        };
        Self { records, summary }
    }
}

/// Where timeline records come from.
pub trait TimelineSource: Send + Sync {
    fn fetch(&self, desk: &str, date: NaiveDate) -> ToolResult<Vec<TimelineRecord>>;
}

/// Hourly synthetic records; stands in until a real data source is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockTimelineSource;

impl TimelineSource for MockTimelineSource {
    fn fetch(&self, desk: &str, date: NaiveDate) -> ToolResult<Vec<TimelineRecord>> {
        let midnight = NaiveDateTime::new(date, NaiveTime::MIN);
        Ok((0..MOCK_RECORDS)
            .map(|i| TimelineRecord {
                ts: midnight + Duration::hours(i),
                cob: date,
                data: format!("/NLRAD/{}/path_{}", desk, i),
                overwrite: i % 2 == 1,
            })
            .collect())
    }
}

/// Query ingestor timeline data.
#[derive(Debug, Default)]
pub struct TimelineTool<S = MockTimelineSource> {
    source: S,
}

impl<S: TimelineSource> TimelineTool<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: TimelineSource> Tool for TimelineTool<S> {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata::new(
            "RAD/ingestor",
            "timeline",
            "Query ingestor timeline data by desk and date",
        )
        .with_params(vec![
            ParamDef::new(
                "desk",
                ParamType::Enum(TIMELINE_DESKS.iter().map(|d| d.to_string()).collect()),
                "Desk name",
            ),
            ParamDef::new("date", ParamType::Date, "Query date (YYYY-MM-DD)"),
        ])
    }

    fn run(&self, ctx: &ExecutionContext, params: &Params) -> ToolResult<Value> {
        self.metadata().params.validate(params)?;

        let desk = params
            .get("desk")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::validation("desk must be a string"))?;
        let raw_date = params
            .get("date")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::validation("date must be a string"))?;
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
            ToolError::validation(format!("Invalid date format: {}", e))
                .with_user_message("Please provide date in YYYY-MM-DD format")
        })?;

        context_event!(info, ctx.logger(), desk, date = %date, "parameters validated");

        let records = self.source.fetch(desk, date)?;
        context_event!(
            info,
            ctx.logger(),
            record_count = records.len(),
            "timeline records retrieved"
        );

        to_payload(&TimelineReport::from_records(records))
    }
}
