use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WeatherError;

/// Placeholder sent to the front end in place of a missing number.
pub const UNAVAILABLE: &str = "N/A";

/// A numeric value the upstream may omit or report as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Value(f64),
    Unavailable,
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Reading::Unavailable, Reading::Value)
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => serializer.serialize_f64(*v),
            Reading::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

/// Keeps a present `null` apart from an absent key: the outer `None` comes
/// from `#[serde(default)]` only when the key is missing.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `GET /v2/pws/observations/current`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservationPayload {
    #[serde(default)]
    pub observations: Option<Vec<RawObservation>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObservation {
    #[serde(rename = "stationID")]
    pub station_id: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub humidity: Option<Option<f64>>,
    pub winddir: Option<f64>,
    pub imperial: Option<RawImperial>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImperial {
    #[serde(default, deserialize_with = "present")]
    pub temp: Option<Option<f64>>,
    pub wind_chill: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub wind_speed: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub pressure: Option<Option<f64>>,
    pub precip_rate: Option<f64>,
    pub precip_total: Option<f64>,
}

/// A key the station must send, though its value may be `null`.
fn required(value: Option<Option<f64>>, field: &str) -> Result<Reading, WeatherError> {
    value.map(Reading::from).ok_or_else(|| WeatherError::missing(field))
}

/// A validated current observation from a personal weather station.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub station_id: String,
    pub temperature_f: Reading,
    pub humidity_pct: Reading,
    pub wind_speed: Reading,
    pub pressure: Reading,
    pub wind_chill: Reading,
    pub precip_rate: Reading,
    pub precip_total: Reading,
    pub lat: f64,
    pub lon: f64,
    pub wind_bearing: Option<f64>,
}

impl TryFrom<RawObservation> for Observation {
    type Error = WeatherError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        let imperial = raw.imperial.ok_or_else(|| WeatherError::missing("imperial"))?;

        Ok(Self {
            station_id: raw.station_id.ok_or_else(|| WeatherError::missing("stationID"))?,
            temperature_f: required(imperial.temp, "imperial.temp")?,
            humidity_pct: required(raw.humidity, "humidity")?,
            wind_speed: required(imperial.wind_speed, "imperial.windSpeed")?,
            pressure: required(imperial.pressure, "imperial.pressure")?,
            wind_chill: imperial.wind_chill.into(),
            precip_rate: imperial.precip_rate.into(),
            precip_total: imperial.precip_total.into(),
            lat: raw.lat.ok_or_else(|| WeatherError::missing("lat"))?,
            lon: raw.lon.ok_or_else(|| WeatherError::missing("lon"))?,
            wind_bearing: raw.winddir,
        })
    }
}

/// Summary returned by `GET /weather`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    #[serde(rename = "stationID")]
    pub station_id: String,
    pub temperature: Reading,
    pub weather: Conditions,
    pub wind_chill: Reading,
    pub rain_forecast: Reading,
    pub total_rain: Reading,
    pub wind_dir: String,
    pub weather_map: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub humidity: Reading,
    pub wind_speed: Reading,
    pub pressure: Reading,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawObservation {
        serde_json::from_value(serde_json::json!({
            "stationID": "KMOJOPLI144",
            "lat": 37.0842,
            "lon": -94.5133,
            "humidity": 81,
            "winddir": 200,
            "imperial": {
                "temp": 61,
                "windChill": 61,
                "windSpeed": 4,
                "pressure": 29.98,
                "precipRate": 0.0,
                "precipTotal": null
            }
        }))
        .unwrap()
    }

    #[test]
    fn reading_serializes_number_or_sentinel() {
        assert_eq!(serde_json::to_string(&Reading::Value(1.5)).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&Reading::Unavailable).unwrap(), "\"N/A\"");
    }

    #[test]
    fn observation_from_complete_raw() {
        let obs = Observation::try_from(raw()).unwrap();
        assert_eq!(obs.station_id, "KMOJOPLI144");
        assert_eq!(obs.temperature_f, Reading::Value(61.0));
        assert_eq!(obs.humidity_pct, Reading::Value(81.0));
        assert_eq!(obs.precip_rate, Reading::Value(0.0));
        assert_eq!(obs.precip_total, Reading::Unavailable);
        assert_eq!(obs.wind_bearing, Some(200.0));
    }

    #[test]
    fn missing_required_field_is_reported_by_name() {
        let mut raw = raw();
        raw.imperial.as_mut().unwrap().pressure = None;

        let err = Observation::try_from(raw).unwrap_err();
        assert!(
            matches!(err, WeatherError::UpstreamDataMissing(ref f) if f == "imperial.pressure")
        );
    }

    #[test]
    fn null_required_field_reads_unavailable() {
        let raw: RawObservation = serde_json::from_value(serde_json::json!({
            "stationID": "KMOJOPLI144",
            "lat": 37.0842,
            "lon": -94.5133,
            "humidity": null,
            "imperial": { "temp": 61, "windSpeed": null, "pressure": 29.98 }
        }))
        .unwrap();
        assert_eq!(raw.imperial.as_ref().unwrap().wind_speed, Some(None));

        let obs = Observation::try_from(raw).unwrap();
        assert_eq!(obs.wind_speed, Reading::Unavailable);
        assert_eq!(obs.humidity_pct, Reading::Unavailable);
        assert_eq!(obs.pressure, Reading::Value(29.98));
    }

    #[test]
    fn absent_required_key_is_still_an_error() {
        let raw: RawObservation = serde_json::from_value(serde_json::json!({
            "stationID": "KMOJOPLI144",
            "lat": 37.0842,
            "lon": -94.5133,
            "humidity": 81,
            "imperial": { "temp": 61, "pressure": 29.98 }
        }))
        .unwrap();

        let err = Observation::try_from(raw).unwrap_err();
        assert!(
            matches!(err, WeatherError::UpstreamDataMissing(ref f) if f == "imperial.windSpeed")
        );
    }

    #[test]
    fn missing_imperial_block() {
        let mut raw = raw();
        raw.imperial = None;
        assert!(Observation::try_from(raw).is_err());
    }

    #[test]
    fn payload_tolerates_null_observations() {
        let payload: ObservationPayload =
            serde_json::from_str(r#"{"observations": null}"#).unwrap();
        assert!(payload.observations.is_none());
    }
}
