//! Feed parsing using the icalendar crate's parser.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

use crate::error::{SyncError, SyncResult};
use crate::event::FeedEvent;

/// Parse an iCalendar document into feed events, one per VEVENT.
///
/// VEVENTs without a usable DTSTART are skipped.
pub fn parse_feed(content: &str) -> SyncResult<Vec<FeedEvent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| SyncError::Fetch(e.to_string()))?;

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(|vevent| {
            let event = parse_vevent(vevent);
            if event.is_none() {
                let uid = vevent.find_prop("UID").map(|p| p.val.to_string());
                tracing::warn!(uid = ?uid, "Skipping VEVENT without a valid DTSTART");
            }
            event
        })
        .collect();

    Ok(events)
}

fn parse_vevent(vevent: &Component<'_>) -> Option<FeedEvent> {
    let start_value = DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?;
    let all_day = matches!(start_value, DatePerhapsTime::Date(_));
    let start = to_utc(start_value);

    // RFC 5545 3.6.1: without DTEND a dated event lasts one day, a timed one is instantaneous
    let end = match vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
    {
        Some(end) => to_utc(end),
        None if all_day => start + Duration::days(1),
        None => start,
    };

    Some(FeedEvent {
        title: text_prop(vevent, "SUMMARY"),
        start,
        end,
        location: text_prop(vevent, "LOCATION"),
        description: text_prop(vevent, "DESCRIPTION"),
    })
}

fn text_prop(vevent: &Component<'_>, name: &str) -> String {
    vevent
        .find_prop(name)
        .map(|p| p.val.to_string())
        .unwrap_or_default()
}

/// Resolve any iCalendar date or date-time to an instant.
///
/// Floating times and unknown TZIDs are read as UTC; dates become midnight UTC.
fn to_utc(value: DatePerhapsTime) -> DateTime<Utc> {
    match value {
        DatePerhapsTime::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => dt,
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => naive.and_utc(),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            match tzid.parse::<chrono_tz::Tz>() {
                Ok(tz) => resolve_local(tz, date_time),
                Err(_) => {
                    tracing::warn!(tzid = %tzid, "Unknown TZID, reading time as UTC");
                    date_time.and_utc()
                }
            }
        }
    }
}

fn resolve_local(tz: chrono_tz::Tz, date_time: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&date_time) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // RFC 5545 3.3.5: a time skipped by a forward shift keeps the offset from before the gap
        LocalResult::None => {
            let before = tz.offset_from_utc_datetime(&(date_time - Duration::days(1))).fix();
            (date_time - Duration::seconds(before.local_minus_utc().into())).and_utc()
        }
    }
}
