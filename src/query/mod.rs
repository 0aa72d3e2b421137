//! Query model
//!
//! Typed, validated representations of the three search shapes. Pure data
//! plus validation; nothing in this module performs I/O.
//!
//! A [`Query`] is built from [`SearchParams`] through one of the
//! endpoint-specific constructors, which validate immediately. Once built it
//! is immutable and [`Query::to_request_params`] always yields the same
//! ordered parameter map, which is what the cache layer keys on.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The three search endpoints exposed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Meeting summaries (`/meeting_list`)
    MeetingList,
    /// Full meetings with nested speeches (`/meeting`)
    Meeting,
    /// Individual speeches (`/speech`)
    Speech,
}

impl Endpoint {
    /// URL path segment under the API base
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::MeetingList => "meeting_list",
            Endpoint::Meeting => "meeting",
            Endpoint::Speech => "speech",
        }
    }

    /// Response field holding the record array
    pub fn record_key(self) -> &'static str {
        match self {
            Endpoint::MeetingList | Endpoint::Meeting => "meetingRecord",
            Endpoint::Speech => "speechRecord",
        }
    }

    /// Documented ceiling for `maximumRecords` on this endpoint
    pub fn max_page_size(self) -> u32 {
        match self {
            Endpoint::MeetingList | Endpoint::Speech => 100,
            Endpoint::Meeting => 10,
        }
    }

    /// Page size the service applies when `maximumRecords` is omitted
    pub fn default_page_size(self) -> u32 {
        match self {
            Endpoint::MeetingList | Endpoint::Speech => 30,
            Endpoint::Meeting => 3,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Search conditions shared by all three endpoints
///
/// Immutable once built; use [`SearchParams::builder`]. Serializes with
/// ISO dates, so a parameter set can be saved and reloaded as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Free-text term matched against speech content
    pub any: Option<String>,
    /// House name (衆議院 / 参議院 / 両院)
    pub name_of_house: Option<String>,
    /// Meeting name
    pub name_of_meeting: Option<String>,
    /// Speaker name
    pub speaker: Option<String>,
    /// Earliest meeting date (inclusive)
    pub from: Option<NaiveDate>,
    /// Latest meeting date (inclusive)
    pub until: Option<NaiveDate>,
    /// Records requested per HTTP call
    pub maximum_records: Option<u32>,
    /// Speech order number within a meeting
    pub speech_number: Option<u32>,
    /// Speaker position
    pub speaker_position: Option<String>,
    /// Speaker parliamentary group
    pub speaker_group: Option<String>,
    /// Speaker role
    pub speaker_role: Option<String>,
    /// Speech identifier
    pub speech_id: Option<String>,
    /// Issue identifier
    pub issue_id: Option<String>,
    /// Diet session range start
    pub session_from: Option<u32>,
    /// Diet session range end
    pub session_to: Option<u32>,
    /// Issue number range start
    pub issue_from: Option<u32>,
    /// Issue number range end
    pub issue_to: Option<u32>,
    /// Include supplements and appendices
    pub supplement_and_appendix: Option<bool>,
    /// Include tables of contents and indices
    pub contents_and_index: Option<bool>,
    /// Search range restriction
    pub search_range: Option<String>,
    /// Closed-session flag
    pub closing: Option<bool>,
}

impl SearchParams {
    /// Create a builder
    pub fn builder() -> SearchParamsBuilder {
        SearchParamsBuilder::default()
    }

    /// True when at least one search condition is set. The service rejects
    /// requests carrying none, so validation enforces this locally first.
    pub fn has_condition(&self) -> bool {
        fn set(s: &Option<String>) -> bool {
            s.as_deref().is_some_and(|v| !v.is_empty())
        }

        set(&self.any)
            || set(&self.name_of_house)
            || set(&self.name_of_meeting)
            || set(&self.speaker)
            || set(&self.speaker_position)
            || set(&self.speaker_group)
            || set(&self.speaker_role)
            || set(&self.speech_id)
            || set(&self.issue_id)
            || self.from.is_some()
            || self.until.is_some()
            || self.speech_number.is_some()
            || self.session_from.is_some()
            || self.session_to.is_some()
            || self.issue_from.is_some()
            || self.issue_to.is_some()
    }
}

/// Builder for [`SearchParams`]
#[derive(Debug, Clone, Default)]
pub struct SearchParamsBuilder {
    params: SearchParams,
}

impl SearchParamsBuilder {
    /// Set the free-text search term
    #[must_use]
    pub fn any(mut self, term: impl Into<String>) -> Self {
        self.params.any = Some(term.into());
        self
    }

    /// Set the house name
    #[must_use]
    pub fn name_of_house(mut self, name: impl Into<String>) -> Self {
        self.params.name_of_house = Some(name.into());
        self
    }

    /// Set the meeting name
    #[must_use]
    pub fn name_of_meeting(mut self, name: impl Into<String>) -> Self {
        self.params.name_of_meeting = Some(name.into());
        self
    }

    /// Set the speaker name
    #[must_use]
    pub fn speaker(mut self, name: impl Into<String>) -> Self {
        self.params.speaker = Some(name.into());
        self
    }

    /// Set the earliest meeting date
    #[must_use]
    pub fn from(mut self, date: NaiveDate) -> Self {
        self.params.from = Some(date);
        self
    }

    /// Set the latest meeting date
    #[must_use]
    pub fn until(mut self, date: NaiveDate) -> Self {
        self.params.until = Some(date);
        self
    }

    /// Shortcut: search from January 1 of the given year. Expanded here, at
    /// construction time, so downstream code only ever sees `from`.
    #[must_use]
    pub fn since(mut self, year: i32) -> Self {
        self.params.from = NaiveDate::from_ymd_opt(year, 1, 1);
        self
    }

    /// Set records per HTTP call
    #[must_use]
    pub fn maximum_records(mut self, n: u32) -> Self {
        self.params.maximum_records = Some(n);
        self
    }

    /// Set the speech order number
    #[must_use]
    pub fn speech_number(mut self, n: u32) -> Self {
        self.params.speech_number = Some(n);
        self
    }

    /// Set the speaker position
    #[must_use]
    pub fn speaker_position(mut self, value: impl Into<String>) -> Self {
        self.params.speaker_position = Some(value.into());
        self
    }

    /// Set the speaker parliamentary group
    #[must_use]
    pub fn speaker_group(mut self, value: impl Into<String>) -> Self {
        self.params.speaker_group = Some(value.into());
        self
    }

    /// Set the speaker role
    #[must_use]
    pub fn speaker_role(mut self, value: impl Into<String>) -> Self {
        self.params.speaker_role = Some(value.into());
        self
    }

    /// Set the speech identifier
    #[must_use]
    pub fn speech_id(mut self, id: impl Into<String>) -> Self {
        self.params.speech_id = Some(id.into());
        self
    }

    /// Set the issue identifier
    #[must_use]
    pub fn issue_id(mut self, id: impl Into<String>) -> Self {
        self.params.issue_id = Some(id.into());
        self
    }

    /// Set the Diet session range
    #[must_use]
    pub fn sessions(mut self, from: u32, to: u32) -> Self {
        self.params.session_from = Some(from);
        self.params.session_to = Some(to);
        self
    }

    /// Set the session range start
    #[must_use]
    pub fn session_from(mut self, session: u32) -> Self {
        self.params.session_from = Some(session);
        self
    }

    /// Set the session range end
    #[must_use]
    pub fn session_to(mut self, session: u32) -> Self {
        self.params.session_to = Some(session);
        self
    }

    /// Set the issue number range
    #[must_use]
    pub fn issues(mut self, from: u32, to: u32) -> Self {
        self.params.issue_from = Some(from);
        self.params.issue_to = Some(to);
        self
    }

    /// Include supplements and appendices
    #[must_use]
    pub fn supplement_and_appendix(mut self, include: bool) -> Self {
        self.params.supplement_and_appendix = Some(include);
        self
    }

    /// Include tables of contents and indices
    #[must_use]
    pub fn contents_and_index(mut self, include: bool) -> Self {
        self.params.contents_and_index = Some(include);
        self
    }

    /// Restrict the search range
    #[must_use]
    pub fn search_range(mut self, range: impl Into<String>) -> Self {
        self.params.search_range = Some(range.into());
        self
    }

    /// Filter on the closed-session flag
    #[must_use]
    pub fn closing(mut self, closing: bool) -> Self {
        self.params.closing = Some(closing);
        self
    }

    /// Build the parameters
    pub fn build(self) -> SearchParams {
        self.params
    }
}

/// A validated search query, tagged by endpoint
///
/// Constructing a variant validates the parameters against that endpoint's
/// contract; an invalid combination never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Query against `/meeting_list`
    MeetingList(SearchParams),
    /// Query against `/meeting`
    Meeting(SearchParams),
    /// Query against `/speech`
    Speech(SearchParams),
}

impl Query {
    /// Build a validated `/meeting_list` query
    pub fn meeting_list(params: SearchParams) -> Result<Self> {
        validate(Endpoint::MeetingList, &params)?;
        Ok(Self::MeetingList(params))
    }

    /// Build a validated `/meeting` query
    pub fn meeting(params: SearchParams) -> Result<Self> {
        validate(Endpoint::Meeting, &params)?;
        Ok(Self::Meeting(params))
    }

    /// Build a validated `/speech` query
    pub fn speech(params: SearchParams) -> Result<Self> {
        validate(Endpoint::Speech, &params)?;
        Ok(Self::Speech(params))
    }

    /// The endpoint this query targets
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Query::MeetingList(_) => Endpoint::MeetingList,
            Query::Meeting(_) => Endpoint::Meeting,
            Query::Speech(_) => Endpoint::Speech,
        }
    }

    /// The underlying search parameters
    pub fn params(&self) -> &SearchParams {
        match self {
            Query::MeetingList(p) | Query::Meeting(p) | Query::Speech(p) => p,
        }
    }

    /// Page size the service will apply to this query
    pub fn effective_page_size(&self) -> u32 {
        self.params()
            .maximum_records
            .unwrap_or_else(|| self.endpoint().default_page_size())
    }

    /// Canonical request parameters in service naming
    ///
    /// The map is ordered (`BTreeMap`), so two equal queries always produce
    /// an identical parameter sequence. Cache signatures depend on this.
    pub fn to_request_params(&self) -> BTreeMap<String, String> {
        let p = self.params();
        let mut out = BTreeMap::new();

        let mut put = |key: &str, value: Option<String>| {
            if let Some(v) = value {
                out.insert(key.to_string(), v);
            }
        };

        put("any", p.any.clone());
        put("nameOfHouse", p.name_of_house.clone());
        put("nameOfMeeting", p.name_of_meeting.clone());
        put("speaker", p.speaker.clone());
        put("from", p.from.map(|d| d.format("%Y-%m-%d").to_string()));
        put("until", p.until.map(|d| d.format("%Y-%m-%d").to_string()));
        put(
            "maximumRecords",
            p.maximum_records.map(|n| n.to_string()),
        );
        put("speechNumber", p.speech_number.map(|n| n.to_string()));
        put("speakerPosition", p.speaker_position.clone());
        put("speakerGroup", p.speaker_group.clone());
        put("speakerRole", p.speaker_role.clone());
        put("speechID", p.speech_id.clone());
        put("issueID", p.issue_id.clone());
        put("sessionFrom", p.session_from.map(|n| n.to_string()));
        put("sessionTo", p.session_to.map(|n| n.to_string()));
        put("issueFrom", p.issue_from.map(|n| n.to_string()));
        put("issueTo", p.issue_to.map(|n| n.to_string()));
        put(
            "supplementAndAppendix",
            p.supplement_and_appendix.map(|b| b.to_string()),
        );
        put(
            "contentsAndIndex",
            p.contents_and_index.map(|b| b.to_string()),
        );
        put("searchRange", p.search_range.clone());
        put("closing", p.closing.map(|b| b.to_string()));

        out.insert("recordPacking".to_string(), "json".to_string());
        out
    }
}

/// Validate parameters against one endpoint's contract
fn validate(endpoint: Endpoint, params: &SearchParams) -> Result<()> {
    if let Some(n) = params.maximum_records {
        if n == 0 {
            return Err(Error::validation("maximum_records must be positive"));
        }
        let ceiling = endpoint.max_page_size();
        if n > ceiling {
            return Err(Error::validation(format!(
                "maximum_records for {endpoint} must be 1..={ceiling}, got {n}"
            )));
        }
    }

    if let (Some(from), Some(until)) = (params.from, params.until) {
        if from > until {
            return Err(Error::validation(format!(
                "date range is inverted: from {from} is after until {until}"
            )));
        }
    }

    if !params.has_condition() {
        return Err(Error::validation(
            "at least one search condition is required",
        ));
    }

    Ok(())
}
