//! Project file + data files -> points, through the public service API.

use sf_app::{run_project, FieldValue, RunRequest};
use std::path::PathBuf;

fn workspace(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sf_app_{name}_{}", std::process::id()));
    std::fs::create_dir_all(dir.join("data")).unwrap();
    dir
}

const PROJECT: &str = r#"
version: 1
name: North plant
classification:
  - { drum_pressure_min: 0, drum_pressure_max: 300, startup_type: Cold }
  - { drum_pressure_min: 300, drum_pressure_max: 3000, startup_type: Hot }
devices:
  - id: hrsg-1-attemp
    use_case: attemperator
    identifier: { site: north, unit: "1" }
    headers:
      time: Time
      steam-pressure: PT-101
      steam-inlet-temp: TT-101
      steam-outlet-temp: TT-102
      outlet-pressure: PT-102
      hrsg-outlet-temp: TT-103
      set-temp: TSP-103
      water-inlet-pressure: PT-201
      water-inlet-temp: TT-201
      water-mass-flow: FT-201
      inlet-steam-mass-flow: FT-101
    data: data/attemp.json
  - id: ct-1
    use_case: classification
    identifier: { site: north, unit: "1" }
    headers: { time: Time, l1: CT Load, p1: Drum Pressure }
    static_metadata:
      "4": { "CT load Threshold": "50" }
    data: data/ct.json
  - id: ct-2
    use_case: classification
    headers: { time: Time, l1: CT Load, p1: Drum Pressure }
    data: data/ct.json
"#;

const ATTEMP: &str = r#"[
  {"Time": "2024-04-02 10:00:00", "PT-101": 600, "TT-101": 750, "TT-102": 650,
   "PT-102": 590, "TT-103": 660, "TSP-103": 655, "PT-201": 800, "TT-201": 400,
   "FT-201": 8, "FT-101": 300},
  {"Time": "2024-04-02 10:01:00", "PT-101": 600, "TT-101": 752, "TT-102": 651,
   "PT-102": 590, "TT-103": 661, "TSP-103": 655, "PT-201": 800, "TT-201": 400,
   "FT-201": 9, "FT-101": 300}
]"#;

const CT: &str = r#"[
  {"Time": "2024-04-02 00:00:00", "CT Load": 10, "Drum Pressure": 150},
  {"Time": "2024-04-02 01:00:00", "CT Load": 80, "Drum Pressure": 150},
  {"Time": "2024-04-02 02:00:00", "CT Load": 85, "Drum Pressure": 900},
  {"Time": "2024-04-02 03:00:00", "CT Load": 0, "Drum Pressure": 900}
]"#;

#[test]
fn runs_every_device_and_reports_failures() {
    let dir = workspace("run");
    let project_path = dir.join("project.yaml");
    std::fs::write(&project_path, PROJECT).unwrap();
    std::fs::write(dir.join("data/attemp.json"), ATTEMP).unwrap();
    std::fs::write(dir.join("data/ct.json"), CT).unwrap();

    let response = run_project(&RunRequest {
        project_path: &project_path,
        device_ids: vec![],
    })
    .unwrap();

    // ct-2 has no threshold metadata
    assert!(!response.is_success());
    assert_eq!(response.failures.len(), 1);
    assert_eq!(response.failures[0].0, "ct-2");
    assert!(response.failures[0].1.to_string().contains("CT load Threshold"));

    let attemp = response
        .reports
        .iter()
        .find(|r| r.device_id == "hrsg-1-attemp")
        .unwrap();
    assert_eq!(attemp.rows, 2);
    assert_eq!(attemp.property_failures, 0);
    let all: Vec<_> = attemp
        .points
        .iter()
        .filter(|p| p.tags.get("group").map(String::as_str) == Some("all"))
        .collect();
    assert_eq!(all.len(), 2);
    match all[0].fields.get("hb_water_flow") {
        Some(FieldValue::Float(hb)) => assert!(*hb > 0.0),
        other => panic!("unexpected hb_water_flow {other:?}"),
    }
    assert!(all[0].fields.contains_key("steam_inlet_enthalpy"));
    assert_eq!(attemp.units.get("steam_inlet_enthalpy"), Some(&"Btu/lb"));

    let ct = response
        .reports
        .iter()
        .find(|r| r.device_id == "ct-1")
        .unwrap();
    let kinds: Vec<_> = ct
        .points
        .iter()
        .map(|p| p.fields.get("Event-Type").cloned())
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(FieldValue::Text("Startup".into())),
            Some(FieldValue::Text("Shutdown".into()))
        ]
    );
    assert_eq!(
        ct.points[0].fields.get("Startup-Type"),
        Some(&FieldValue::Text("Cold".into()))
    );
    assert_eq!(
        ct.points[1].fields.get("Time-between-events"),
        Some(&FieldValue::Float(7200.0))
    );
}

#[test]
fn selected_device_only() {
    let dir = workspace("select");
    let project_path = dir.join("project.yaml");
    std::fs::write(&project_path, PROJECT).unwrap();
    std::fs::write(dir.join("data/ct.json"), CT).unwrap();

    let response = run_project(&RunRequest {
        project_path: &project_path,
        device_ids: vec!["ct-1".into()],
    })
    .unwrap();
    assert!(response.is_success());
    assert_eq!(response.reports.len(), 1);
    assert_eq!(response.reports[0].points.len(), 2);

    let err = run_project(&RunRequest {
        project_path: &project_path,
        device_ids: vec!["missing".into()],
    })
    .unwrap_err();
    assert!(err.to_string().contains("missing"));
}
