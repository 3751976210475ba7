use chrono::{Days, NaiveDateTime, NaiveTime, TimeDelta};

pub const DEFAULT_PAST_DATE_MESSAGE: &str = "You cannot schedule a visit in the past";
pub const DEFAULT_VISIT_HOUR: u32 = 9;

/// Rules applied when booking a visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRules {
    pub past_date_message: String,
    /// Hour of the next day proposed when the caller gives no time.
    pub default_visit_hour: u32,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            past_date_message: DEFAULT_PAST_DATE_MESSAGE.to_string(),
            default_visit_hour: DEFAULT_VISIT_HOUR,
        }
    }
}

impl BookingRules {
    /// Tomorrow, at the start of the day plus `default_visit_hour` hours.
    pub fn default_visit_time(&self, now: NaiveDateTime) -> NaiveDateTime {
        let tomorrow = now.date() + Days::new(1);
        tomorrow.and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(self.default_visit_hour))
    }

    /// Returns the rejection message if `proposed` lies strictly before `now`.
    pub fn check_visit_time(&self, proposed: NaiveDateTime, now: NaiveDateTime) -> Option<&str> {
        if proposed < now {
            Some(self.past_date_message.as_str())
        } else {
            None
        }
    }
}
