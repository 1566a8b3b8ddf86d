use std::fmt::Write;

use weather_core::WeatherSummary;

/// Multi-line, human-readable rendering of current conditions.
pub fn format_summary(s: &WeatherSummary) -> String {
    let mut out = String::new();

    let location = match &s.country {
        Some(country) => format!("{}, {}", s.location_name, country),
        None => s.location_name.clone(),
    };

    let _ = writeln!(out, "{location}  {}", s.condition_kind().symbol());
    let _ = writeln!(
        out,
        "  Temperature  {:.0}°F (feels like {:.0}°F)",
        s.temperature_f, s.feels_like_f
    );
    let _ = writeln!(out, "  Min/Max      {:.0}°F / {:.0}°F", s.temp_min_f, s.temp_max_f);

    if s.description.is_empty() {
        let _ = writeln!(out, "  Humidity     {}%", s.humidity_pct);
    } else {
        let _ = writeln!(out, "  Humidity     {}%  ({})", s.humidity_pct, s.description);
    }

    match s.wind_deg {
        Some(deg) => {
            let _ = writeln!(out, "  Wind         {:.0} mph, direction {deg}°", s.wind_speed_mph);
        }
        None => {
            let _ = writeln!(out, "  Wind         {:.0} mph", s.wind_speed_mph);
        }
    }

    if let Some(at) = s.observation_time {
        let _ = writeln!(out, "  Observed     {}", at.format("%Y-%m-%d %H:%M UTC"));
    }

    out
}
