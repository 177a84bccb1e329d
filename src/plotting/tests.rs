use std::sync::{Arc, Mutex};

use super::figure::Panel;
use super::*;
use crate::error::{PlotError, Result};
use crate::test_support::dataset;
use pretty_assertions::assert_eq;

fn standard_run(request: &[&str]) -> PlotResult {
    let (data, support) = dataset();
    let catalog = PlotCatalog::standard();
    let snapshot = StyleConfig::new().snapshot();
    RenderPipeline::new(&catalog, RenderOptions::default()).run(request, &data, &support, &snapshot)
}

#[test]
fn test_unknown_token_becomes_warning() {
    let result = standard_run(&["Bpa", "unknown_code", "Hist"]);
    assert_eq!(result.len(), 2);
    assert_eq!(result.names(), &["Bpa_PCE_by_sample", "Hist_PCE_histogram"]);
    assert_eq!(result.warnings().len(), 1);
    let warning = &result.warnings()[0];
    assert_eq!(warning.token, "unknown_code");
    assert!(matches!(&warning.error, PlotError::UnknownPlotType(t) if t == "unknown_code"));
}

#[test]
fn test_repeated_tokens_get_distinct_names() {
    let result = standard_run(&["Cw", "Cw", "Cw"]);
    assert_eq!(
        result.names(),
        &["Cw_jv_best_device", "Cw_jv_best_device_2", "Cw_jv_best_device_3"]
    );
}

#[test]
fn test_multi_figure_names_carry_keys() {
    let result = standard_run(&["Cd", "Bpgb"]);
    assert_eq!(
        result.names(),
        &[
            "Cd_jv_per_substrate_S1",
            "Cd_jv_per_substrate_S2",
            "Cd_jv_per_substrate_S3",
            "Bpgb_PCE_by_condition_cell_additive",
            "Bpgb_PCE_by_condition_cell_ctrl",
        ]
    );
    assert_eq!(result.figures().len(), result.names().len());
}

#[test]
fn test_names_are_file_safe() {
    let result = standard_run(&["Bpa", "Cx", "Cb", "Hj", "Jallc", "Bpcb"]);
    for name in result.names() {
        assert!(
            name.chars().all(|c| c.is_ascii_alphanumeric() || "_-.".contains(c)),
            "{name} is not file safe"
        );
    }
}

#[test]
fn test_construction_failure_is_wrapped() {
    let (data, mut support) = dataset();
    support.has_conditions = false;
    let catalog = PlotCatalog::standard();
    let result = RenderPipeline::new(&catalog, RenderOptions::default()).run(
        &["Bpg", "Hp"],
        &data,
        &support,
        &StyleSnapshot::default(),
    );
    assert_eq!(result.names(), &["Hp_PCE_histogram"]);
    match &result.warnings()[0].error {
        PlotError::Construction { token, source } => {
            assert_eq!(token, "Bpg");
            assert!(matches!(**source, PlotError::MissingConditions));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_every_figure_is_styled() {
    let (data, support) = dataset();
    let mut config = StyleConfig::new();
    config.set(Some(9), Some(22), Some(7)).unwrap();
    let catalog = PlotCatalog::standard();
    let result = RenderPipeline::new(&catalog, RenderOptions::default()).run(
        &["Bpa", "Ballb", "Hv", "Cy", "Cb", "Cdw"],
        &data,
        &support,
        &config.snapshot(),
    );
    assert!(result.warnings().is_empty(), "{:?}", result.warnings());
    for figure in result.figures() {
        assert_eq!(figure.title.as_ref().unwrap().font_size, 22);
        for axis in figure.axes() {
            assert_eq!(axis.tick_font_size, 9);
            if let Some(label) = &axis.label {
                assert_eq!(label.font_size, 9);
            }
        }
        if let Some(legend) = &figure.legend {
            assert_eq!(legend.font_size, 7);
        }
    }
}

#[test]
fn test_empty_request() {
    let result = standard_run(&[]);
    assert!(result.is_empty());
    assert!(result.warnings().is_empty());
}

/// Changes the shared style every time it is constructed.
struct Meddler {
    shared: Arc<Mutex<StyleConfig>>,
}

impl PlotConstructor for Meddler {
    fn label(&self, _args: &PlotArgs) -> String {
        "meddler".into()
    }

    fn args(&self) -> ArgSpec {
        ArgSpec::None
    }

    fn construct(&self, _ctx: &PlotContext<'_>) -> Result<Constructed> {
        let mut style = self.shared.lock().unwrap();
        let next = style.font_sizes().axis + 1;
        style.set(Some(next), Some(30), None)?;
        Ok(Constructed::Single(Figure::single(
            "meddler",
            Panel::new(figure::Axis::labeled("x"), figure::Axis::labeled("y")),
        )))
    }
}

#[test]
fn test_style_changes_during_render_do_not_leak() {
    let shared = Arc::new(Mutex::new(StyleConfig::new()));
    let mut catalog = PlotCatalog::standard();
    catalog
        .register(
            "M",
            Meddler {
                shared: Arc::clone(&shared),
            },
        )
        .unwrap();

    let (data, support) = dataset();
    let snapshot = shared.lock().unwrap().snapshot();
    let result = RenderPipeline::new(&catalog, RenderOptions::default()).run(
        &["M", "M", "M", "M", "M"],
        &data,
        &support,
        &snapshot,
    );

    assert_eq!(result.len(), 5);
    for figure in result.figures() {
        assert_eq!(figure.title.as_ref().unwrap().font_size, 16);
        assert!(figure.axes().all(|a| a.tick_font_size == 12));
    }
    assert_eq!(shared.lock().unwrap().font_sizes().axis, 17);
}

/// Claims a single figure but returns several.
struct Overproducer;

impl PlotConstructor for Overproducer {
    fn label(&self, _args: &PlotArgs) -> String {
        "over".into()
    }

    fn args(&self) -> ArgSpec {
        ArgSpec::None
    }

    fn construct(&self, _ctx: &PlotContext<'_>) -> Result<Constructed> {
        Ok(Constructed::Multi(vec![
            ("a".into(), Figure::placeholder("a")),
            ("b".into(), Figure::placeholder("b")),
        ]))
    }
}

#[test]
fn test_single_arity_with_many_figures_is_an_error() {
    let mut catalog = PlotCatalog::new();
    catalog.register("O", Overproducer).unwrap();
    let (data, support) = dataset();
    let result = RenderPipeline::new(&catalog, RenderOptions::default()).run(
        &["O"],
        &data,
        &support,
        &StyleSnapshot::default(),
    );
    assert!(result.is_empty());
    assert!(matches!(
        result.warnings()[0].error,
        PlotError::Construction { .. }
    ));
}
