use vle_project::*;
use vle_solver::SolverConfig;

fn ether_scenario() -> ScenarioDef {
    ScenarioDef {
        version: 1,
        name: "two chambers".to_string(),
        initial_temperature_k: 373.0,
        target_temperature_k: 273.0,
        steps_per_kelvin: 1,
        solver: SolverConfig::default(),
        chambers: vec![
            ChamberDef {
                name: "a".to_string(),
                substances: vec![SubstanceDef {
                    name: "ether".to_string(),
                    moles: 1.0,
                    initial_pressure_pa: Some(106_600.0),
                    tolerance_pa: 5.0,
                    vapor_pressure: VaporPressureDef::TwoPoint {
                        samples: [[293.0, 59_980.0], [313.0, 119_960.0]],
                    },
                }],
            },
            ChamberDef {
                name: "b".to_string(),
                substances: vec![
                    SubstanceDef {
                        name: "ether".to_string(),
                        moles: 0.5,
                        initial_pressure_pa: Some(53_300.0),
                        tolerance_pa: 5.0,
                        vapor_pressure: VaporPressureDef::TwoPoint {
                            samples: [[293.0, 59_980.0], [313.0, 119_960.0]],
                        },
                    },
                    SubstanceDef {
                        name: "nitrogen".to_string(),
                        moles: 0.5,
                        initial_pressure_pa: None,
                        tolerance_pa: 0.0,
                        vapor_pressure: VaporPressureDef::Inert,
                    },
                ],
            },
        ],
    }
}

#[test]
fn roundtrip_yaml() {
    let scenario = ether_scenario();
    let path = std::env::temp_dir().join("vle_project_roundtrip.yaml");

    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json_through_extension_dispatch() {
    let scenario = ether_scenario();
    let path = std::env::temp_dir().join("vle_project_roundtrip.json");

    save_json(&path, &scenario).unwrap();
    let loaded = load_scenario(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn loading_validates_the_scenario() {
    let mut scenario = ether_scenario();
    scenario.chambers[1].name = "a".to_string();
    let path = std::env::temp_dir().join("vle_project_duplicate_chambers.json");
    std::fs::write(&path, serde_json::to_string(&scenario).unwrap()).unwrap();

    assert!(matches!(
        load_scenario(&path),
        Err(ProjectError::Validation(ValidationError::DuplicateId { .. }))
    ));
}

#[test]
fn unknown_extension_is_rejected() {
    let path = std::path::Path::new("scenario.toml");
    assert!(matches!(
        load_scenario(path),
        Err(ProjectError::UnsupportedFormat { .. })
    ));
}

#[test]
fn defaults_fill_missing_sections() {
    let yaml = r#"
version: 1
name: minimal
initial_temperature_k: 300.0
target_temperature_k: 290.0
chambers:
  - name: only
    substances:
      - name: nitrogen
        moles: 1.0
        initial_pressure_pa: 100000.0
        vapor_pressure:
          type: inert
"#;
    let scenario: ScenarioDef = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(scenario.steps_per_kelvin, 1);
    assert_eq!(scenario.solver, SolverConfig::default());
    assert_eq!(scenario.chambers[0].substances[0].tolerance_pa, 0.0);
    validate_scenario(&scenario).unwrap();
}

#[test]
fn demo_scenario_loads_and_compiles() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos/ether_ethanol_nitrogen.yaml");
    let scenario = load_scenario(&path).unwrap();
    let compiled = compile_scenario(&scenario).unwrap();

    assert_eq!(compiled.solver.chambers().len(), 2);
    assert_eq!(compiled.solver.temperature_k(), 373.0);
    assert_eq!(compiled.schedule.step_count(373.0), 100);
    assert!(compiled.solver.is_pressure_balanced());
}

#[test]
fn compiled_chamber_volume_comes_from_first_substance() {
    let compiled = compile_scenario(&ether_scenario()).unwrap();
    let a = compiled.solver.chamber("a").unwrap();
    let expected = 1.0 * vle_core::constants::R_GAS * 373.0 / 106_600.0;
    assert!((a.volume() - expected).abs() < 1e-9);
    assert_eq!(a.total_liquid_moles(), 0.0);
}
