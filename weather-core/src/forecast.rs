//! Reshapes the weather.com 5-day daily forecast into one record per day.

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{error::WeatherError, model::Reading};

pub const NO_NARRATIVE: &str = "No narrative available";
pub const DEFAULT_ICON: &str = "default";

/// Body of `GET /v3/wx/forecast/daily/5day`: parallel arrays, one slot per
/// day, plus a daypart table with one slot per half-day.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawForecast {
    #[serde(default)]
    pub day_of_week: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub narrative: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature_min: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub daypart: Vec<RawDaypart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDaypart {
    #[serde(default, deserialize_with = "null_as_default")]
    pub daypart_name: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub day_or_night: Vec<Option<String>>,
    /// Kept as raw values so one odd slot can't fail the whole forecast.
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon_code: Vec<serde_json::Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconCode {
    Code(String),
    Default,
}

impl IconCode {
    pub fn as_str(&self) -> &str {
        match self {
            IconCode::Code(code) => code,
            IconCode::Default => DEFAULT_ICON,
        }
    }

    /// Reads one `iconCode` slot. Integers, whole floats and non-blank
    /// strings are codes; anything else is `None`.
    fn from_value(value: &serde_json::Value) -> Option<Self> {
        let code = match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(code) => code.to_string(),
                None => n
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 1e15)
                    .map(|f| (f as i64).to_string())?,
            },
            serde_json::Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty())?.to_string(),
            _ => return None,
        };
        Some(IconCode::Code(code))
    }
}

impl Serialize for IconCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub day: String,
    pub narrative: String,
    pub icon_code: IconCode,
    pub temp_max: Reading,
    pub temp_min: Reading,
}

impl RawDaypart {
    fn icon_at(&self, idx: usize) -> Option<IconCode> {
        self.icon_code.get(idx).and_then(IconCode::from_value)
    }

    fn is_night(&self, idx: usize) -> bool {
        self.day_or_night
            .get(idx)
            .and_then(Option::as_deref)
            .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("N"))
    }

    fn slots_named<'a>(&'a self, label: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.daypart_name.iter().enumerate().filter_map(move |(idx, name)| {
            name.as_deref().is_some_and(|n| n.trim().eq_ignore_ascii_case(label)).then_some(idx)
        })
    }

    fn night_icon_after(&self, idx: usize) -> Option<IconCode> {
        let night = idx + 1;
        if self.is_night(night) { self.icon_at(night) } else { None }
    }

    /// First non-null icon among the slots named `label`; failing that, the
    /// `N`-flagged slot right after one of them.
    fn icon_named(&self, label: &str) -> Option<IconCode> {
        self.slots_named(label)
            .find_map(|idx| self.icon_at(idx))
            .or_else(|| self.slots_named(label).find_map(|idx| self.night_icon_after(idx)))
    }

    /// Icon for a day label; `Today` resolves through `Tonight` when it has
    /// nothing of its own.
    fn icon_for(&self, label: &str) -> IconCode {
        self.icon_named(label)
            .or_else(|| {
                if label.eq_ignore_ascii_case("today") { self.icon_named("tonight") } else { None }
            })
            .unwrap_or(IconCode::Default)
    }
}

/// English weekday name as weather.com spells it in `dayOfWeek`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn is_weekday(name: &str, day: Weekday) -> bool {
    name.trim().eq_ignore_ascii_case(weekday_name(day))
}

/// Build one [`ForecastDay`] per `dayOfWeek` entry, in upstream order.
///
/// `today` is the caller's current weekday; it decides which entries are
/// relabeled `Today`/`Tonight` and `Tomorrow`. Only a missing or empty
/// `dayOfWeek` is an error; every other gap degrades to a sentinel.
pub fn normalize_forecast(
    raw: &RawForecast,
    today: Weekday,
) -> Result<Vec<ForecastDay>, WeatherError> {
    let days = raw
        .day_of_week
        .as_deref()
        .filter(|days| !days.is_empty())
        .ok_or_else(|| WeatherError::missing("dayOfWeek"))?;

    let today_idx = days.iter().position(|d| is_weekday(d, today));
    let tomorrow_idx = days.iter().position(|d| is_weekday(d, today.succ()));
    let daypart = raw.daypart.first();

    let forecast = days
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let narrative = raw.narrative.get(idx).cloned().flatten();

            let day = if Some(idx) == today_idx {
                let at_night = narrative
                    .as_deref()
                    .is_some_and(|text| text.to_lowercase().contains("night"));
                if at_night { "Tonight".to_string() } else { "Today".to_string() }
            } else if Some(idx) == tomorrow_idx {
                "Tomorrow".to_string()
            } else {
                name.clone()
            };

            let icon_code = daypart.map_or(IconCode::Default, |dp| dp.icon_for(&day));

            ForecastDay {
                narrative: narrative.unwrap_or_else(|| NO_NARRATIVE.to_string()),
                icon_code,
                temp_max: raw.temperature_max.get(idx).copied().flatten().into(),
                temp_min: raw.temperature_min.get(idx).copied().flatten().into(),
                day,
            }
        })
        .collect();

    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shape of a real afternoon response: today's daytime slot is already null.
    fn payload() -> RawForecast {
        serde_json::from_value(serde_json::json!({
            "dayOfWeek": ["Wednesday", "Thursday", "Friday", "Saturday", "Sunday"],
            "narrative": [
                "Clear skies tonight. Low 48F.",
                "Sunshine. Highs in the upper 60s.",
                "Showers early.",
                "Partly cloudy.",
                "Rain likely."
            ],
            "temperatureMax": [null, 68, 63, 66, 58],
            "temperatureMin": [48, 50, 45, 47, 44],
            "daypart": [{
                "dayOrNight": [null, "N", "D", "N", "D", "N", "D", "N", "D", "N"],
                "daypartName": [
                    null, "Tonight", "Tomorrow", "Tomorrow night", "Friday",
                    "Friday night", "Saturday", "Saturday night", "Sunday", "Sunday night"
                ],
                "iconCode": [null, 31, 32, 29, 11, 27, 30, 29, 12, 11]
            }]
        }))
        .unwrap()
    }

    fn labels(days: &[ForecastDay]) -> Vec<&str> {
        days.iter().map(|d| d.day.as_str()).collect()
    }

    #[test]
    fn one_record_per_day_in_upstream_order() {
        let days = normalize_forecast(&payload(), Weekday::Mon).unwrap();
        assert_eq!(labels(&days), ["Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]);
    }

    #[test]
    fn today_with_night_narrative_becomes_tonight() {
        let days = normalize_forecast(&payload(), Weekday::Wed).unwrap();
        assert_eq!(labels(&days), ["Tonight", "Tomorrow", "Friday", "Saturday", "Sunday"]);

        assert_eq!(days[0].icon_code, IconCode::Code("31".into()));
        assert_eq!(days[1].icon_code, IconCode::Code("32".into()));
        assert_eq!(days[2].icon_code, IconCode::Code("11".into()));
        assert_eq!(days[4].icon_code, IconCode::Code("12".into()));
    }

    #[test]
    fn today_with_daytime_narrative_stays_today() {
        let mut raw = payload();
        raw.narrative[0] = Some("Mostly sunny. High 70F.".into());

        let days = normalize_forecast(&raw, Weekday::Wed).unwrap();
        assert_eq!(days[0].day, "Today");
        // No daytime slot left, so the tonight icon is used.
        assert_eq!(days[0].icon_code, IconCode::Code("31".into()));
    }

    #[test]
    fn night_match_is_case_insensitive() {
        let mut raw = payload();
        raw.narrative[0] = Some("NIGHT: clear".into());
        let days = normalize_forecast(&raw, Weekday::Wed).unwrap();
        assert_eq!(days[0].day, "Tonight");
    }

    #[test]
    fn tomorrow_is_labeled_without_today_present() {
        let days = normalize_forecast(&payload(), Weekday::Tue).unwrap();
        assert_eq!(labels(&days), ["Tomorrow", "Thursday", "Friday", "Saturday", "Sunday"]);
        // "Tomorrow" in the daypart table refers to Thursday; the label wins.
        assert_eq!(days[0].icon_code, IconCode::Code("32".into()));
    }

    #[test]
    fn week_wraps_from_sunday_to_monday() {
        let mut raw = payload();
        raw.day_of_week = Some(vec!["Sunday".into(), "Monday".into()]);
        let days = normalize_forecast(&raw, Weekday::Sun).unwrap();
        assert_eq!(days[1].day, "Tomorrow");
    }

    #[test]
    fn empty_daypart_table_uses_default_icon() {
        let mut raw = payload();
        raw.daypart.clear();

        let days = normalize_forecast(&raw, Weekday::Wed).unwrap();
        assert_eq!(days.len(), 5);
        assert!(days.iter().all(|d| d.icon_code == IconCode::Default));
        assert_eq!(serde_json::to_value(&days[0]).unwrap()["iconCode"], "default");
    }

    #[test]
    fn short_arrays_degrade_to_sentinels() {
        let raw: RawForecast = serde_json::from_value(serde_json::json!({
            "dayOfWeek": ["Friday", "Saturday", "Sunday"],
            "narrative": ["Showers early."],
            "temperatureMax": [63],
            "daypart": [{ "daypartName": ["Friday"], "iconCode": [] }]
        }))
        .unwrap();

        let days = normalize_forecast(&raw, Weekday::Mon).unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[1].narrative, NO_NARRATIVE);
        assert_eq!(days[0].temp_max, Reading::Value(63.0));
        assert_eq!(days[0].temp_min, Reading::Unavailable);
        assert_eq!(days[2].temp_max, Reading::Unavailable);
        assert!(days.iter().all(|d| d.icon_code == IconCode::Default));
    }

    #[test]
    fn null_arrays_are_tolerated() {
        let raw: RawForecast = serde_json::from_str(
            r#"{"dayOfWeek": ["Monday"], "narrative": null, "daypart": null}"#,
        )
        .unwrap();

        let days = normalize_forecast(&raw, Weekday::Fri).unwrap();
        assert_eq!(days[0].narrative, NO_NARRATIVE);
        assert_eq!(days[0].icon_code, IconCode::Default);
    }

    #[test]
    fn string_icon_codes_are_accepted() {
        let raw: RawForecast = serde_json::from_value(serde_json::json!({
            "dayOfWeek": ["Friday"],
            "daypart": [{ "daypartName": ["friday"], "iconCode": ["26"] }]
        }))
        .unwrap();

        let days = normalize_forecast(&raw, Weekday::Mon).unwrap();
        assert_eq!(days[0].icon_code.as_str(), "26");
    }

    #[test]
    fn null_weekday_icon_uses_its_night_slot() {
        let mut raw = payload();
        raw.daypart[0].icon_code[4] = serde_json::Value::Null;

        let days = normalize_forecast(&raw, Weekday::Mon).unwrap();
        assert_eq!(days[2].day, "Friday");
        assert_eq!(days[2].icon_code, IconCode::Code("27".into()));
    }

    #[test]
    fn null_tomorrow_icon_uses_tomorrow_night() {
        let mut raw = payload();
        raw.daypart[0].icon_code[2] = serde_json::Value::Null;

        let days = normalize_forecast(&raw, Weekday::Tue).unwrap();
        assert_eq!(days[0].day, "Tomorrow");
        assert_eq!(days[0].icon_code, IconCode::Code("29".into()));
    }

    #[test]
    fn slot_after_a_null_icon_must_be_flagged_night() {
        let mut raw = payload();
        raw.daypart[0].icon_code[4] = serde_json::Value::Null;
        raw.daypart[0].day_or_night[5] = Some("D".into());

        let days = normalize_forecast(&raw, Weekday::Mon).unwrap();
        assert_eq!(days[2].icon_code, IconCode::Default);
    }

    #[test]
    fn odd_icon_values_degrade_per_slot() {
        let raw: RawForecast = serde_json::from_value(serde_json::json!({
            "dayOfWeek": ["Friday", "Saturday", "Sunday"],
            "daypart": [{
                "daypartName": ["Friday", "Saturday", "Sunday"],
                "iconCode": [31.0, {"code": 30}, 12.5]
            }]
        }))
        .unwrap();

        let days = normalize_forecast(&raw, Weekday::Mon).unwrap();
        assert_eq!(days[0].icon_code.as_str(), "31");
        assert_eq!(days[1].icon_code, IconCode::Default);
        assert_eq!(days[2].icon_code, IconCode::Default);
    }

    #[test]
    fn missing_or_empty_day_of_week_is_an_error() {
        let err = normalize_forecast(&RawForecast::default(), Weekday::Mon).unwrap_err();
        assert!(matches!(err, WeatherError::UpstreamDataMissing(ref f) if f == "dayOfWeek"));

        let mut raw = payload();
        raw.day_of_week = Some(Vec::new());
        assert!(normalize_forecast(&raw, Weekday::Mon).is_err());
    }

    #[test]
    fn serialized_record_shape() {
        let days = normalize_forecast(&payload(), Weekday::Wed).unwrap();
        let json = serde_json::to_value(&days[0]).unwrap();

        assert_eq!(json["day"], "Tonight");
        assert_eq!(json["iconCode"], "31");
        assert_eq!(json["tempMax"], "N/A");
        assert_eq!(json["tempMin"], 48.0);
        assert!(json["narrative"].as_str().unwrap().starts_with("Clear"));
    }
}
