//! JSON export of dashboard data.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, Map, Value};

use crate::data::duration::format_kpi;
use crate::data::{DashboardData, DurationField};

/// Build the export document for `data`.
pub fn to_json(data: &DashboardData) -> Value {
    let mut export = Map::new();

    export.insert("filter".to_string(), json!(data.filter));
    export.insert(
        "date_bounds".to_string(),
        json!(data.date_bounds.map(|(lo, hi)| [lo.to_string(), hi.to_string()])),
    );

    // KPIs, raw minutes plus formatted labels
    let mut kpis = Map::new();
    kpis.insert("total_tickets".to_string(), json!(data.kpis.total_tickets));
    kpis.insert("closed_tickets".to_string(), json!(data.kpis.closed_tickets));
    kpis.insert("companies".to_string(), json!(data.kpis.companies));
    kpis.insert("channel_types".to_string(), json!(data.kpis.channel_types));
    for field in DurationField::ALL {
        let avg = data.kpis.average(field);
        let key = field.column().trim_end_matches("_minutes");
        kpis.insert(
            format!("avg_{}", key),
            json!({
                "minutes": avg,
                "label": format_kpi(avg),
            }),
        );
    }
    export.insert("kpis".to_string(), Value::Object(kpis));

    export.insert("channels".to_string(), json!(data.channels));
    export.insert("tabulations".to_string(), ranking(&data.tabulations));
    export.insert("top_customers".to_string(), ranking(&data.top_customers));
    export.insert("top_agents".to_string(), ranking(&data.top_agents));

    export.insert("tickets".to_string(), json!(data.table_rows()));
    export.insert("caption".to_string(), json!(data.table_caption()));

    Value::Object(export)
}

fn ranking(entries: &Option<Vec<(String, usize)>>) -> Value {
    match entries {
        Some(entries) => Value::Array(
            entries
                .iter()
                .map(|(name, total)| json!({ "name": name, "total": total }))
                .collect(),
        ),
        None => Value::Null,
    }
}

/// Write the export document to `path` as pretty JSON.
pub fn write_export(data: &DashboardData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&to_json(data))?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{columns, DashboardLimits, TicketFilter, TicketRecord, TicketTable};
    use chrono::{Duration, TimeZone, Utc};

    fn sample() -> DashboardData {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let records = vec![
            TicketRecord {
                created_at: Some(created),
                attended_at: Some(created + Duration::minutes(10)),
                closed_at: Some(created + Duration::minutes(100)),
                closed: true,
                ..Default::default()
            }
            .with_attribute(columns::AGENT_LOGIN, "ana")
            .with_attribute(columns::CHANNEL_NAME, "chat"),
            TicketRecord {
                created_at: Some(created),
                ..Default::default()
            }
            .with_attribute(columns::CHANNEL_NAME, "email"),
        ];
        let names = [
            columns::CREATED_AT,
            columns::ATTENDED_AT,
            columns::CLOSED_AT,
            columns::AGENT_LOGIN,
            columns::CHANNEL_NAME,
            columns::CLOSED,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        let table = TicketTable::new(names, records);
        DashboardData::build(&table, &TicketFilter::default(), &DashboardLimits::default())
    }

    #[test]
    fn test_export_document() {
        let doc = to_json(&sample());

        assert_eq!(doc["kpis"]["closed_tickets"], 1);
        assert_eq!(doc["kpis"]["avg_handling_time"]["minutes"], 90.0);
        assert_eq!(doc["kpis"]["avg_handling_time"]["label"], "1h 30m (1.5h)");
        assert_eq!(doc["kpis"]["avg_cycle_time"]["label"], "1h 40m (1.7h)");
        assert_eq!(doc["top_agents"][0]["name"], "ana");
        assert!(doc["tabulations"].is_null());
        assert_eq!(doc["channels"].as_array().unwrap().len(), 2);
        assert_eq!(doc["tickets"][0]["cycle_time_minutes"], 100);
        assert_eq!(doc["caption"], "Showing 1 of 1 records");
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        write_export(&sample(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let doc: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["kpis"]["total_tickets"], 2);
    }
}
