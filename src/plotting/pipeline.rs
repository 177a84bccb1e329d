//! Turns a list of plot tokens into styled, named figures.

use tracing::{debug, info, warn};

use super::catalog::{Arity, Constructed, PlotCatalog, PlotContext, RenderOptions};
use super::figure::Figure;
use super::styler::FigureStyler;
use super::styles::StyleSnapshot;
use crate::error::{PlotError, Result};
use crate::types::{MeasurementDataset, SupportData};
use crate::utils::UniqueNames;

/// A token that produced no figure, and why.
#[derive(Debug)]
pub struct RenderWarning {
    pub token: String,
    pub error: PlotError,
}

impl std::fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.token, self.error)
    }
}

/// Figures of one render call with their file-safe names.
///
/// Figures and names are only appended together, so `figures()[i]` is always
/// named `names()[i]`.
#[derive(Debug, Default)]
pub struct PlotResult {
    figures: Vec<Figure>,
    names: Vec<String>,
    warnings: Vec<RenderWarning>,
}

impl PlotResult {
    fn push(&mut self, name: String, figure: Figure) {
        self.names.push(name);
        self.figures.push(figure);
    }

    fn warn(&mut self, token: &str, error: PlotError) {
        warn!(token, %error, "plot skipped");
        self.warnings.push(RenderWarning {
            token: token.to_string(),
            error,
        });
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    /// `(name, figure)` pairs in render order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Figure)> {
        self.names.iter().map(String::as_str).zip(&self.figures)
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Figure>, Vec<String>, Vec<RenderWarning>) {
        (self.figures, self.names, self.warnings)
    }
}

/// One render pass over a catalog.
pub struct RenderPipeline<'c> {
    catalog: &'c PlotCatalog,
    options: RenderOptions,
}

impl<'c> RenderPipeline<'c> {
    pub fn new(catalog: &'c PlotCatalog, options: RenderOptions) -> Self {
        Self { catalog, options }
    }

    /// Render every token in order.
    ///
    /// Never fails as a whole: unknown tokens and failing routines become
    /// warnings and the remaining tokens are still rendered. Every figure is
    /// styled with `style`, so later changes to the live configuration do not
    /// affect this call.
    pub fn run<S: AsRef<str>>(
        &self,
        request: &[S],
        dataset: &MeasurementDataset,
        support: &SupportData,
        style: &StyleSnapshot,
    ) -> PlotResult {
        let mut result = PlotResult::default();
        let mut names = UniqueNames::new();

        for token in request.iter().map(AsRef::as_ref) {
            match self.render_token(token, dataset, support, style) {
                Ok(figures) => {
                    debug!(token, count = figures.len(), "plot rendered");
                    for (stem, figure) in figures {
                        result.push(names.claim(&stem), figure);
                    }
                }
                Err(error) => result.warn(token, error),
            }
        }

        info!(
            requested = request.len(),
            figures = result.len(),
            warnings = result.warnings.len(),
            "render finished"
        );
        result
    }

    /// Styled figures of one token with their name stems.
    fn render_token(
        &self,
        token: &str,
        dataset: &MeasurementDataset,
        support: &SupportData,
        style: &StyleSnapshot,
    ) -> Result<Vec<(String, Figure)>> {
        let resolved = self.catalog.resolve(token)?;
        let ctx = PlotContext {
            args: &resolved.args,
            dataset,
            support,
            colors: style.colors(),
            options: &self.options,
        };
        let constructed = resolved
            .constructor
            .construct(&ctx)
            .map_err(|e| PlotError::construction(token, e))?;

        let base = format!("{token}_{}", resolved.label());
        let figures = match (resolved.arity(), constructed) {
            (_, Constructed::Single(figure)) => vec![(base, figure)],
            (Arity::Single, Constructed::Multi(figures)) if figures.len() == 1 => figures
                .into_iter()
                .map(|(_, figure)| (base.clone(), figure))
                .collect(),
            (Arity::Multi, Constructed::Multi(figures)) if figures.is_empty() => {
                return Err(PlotError::construction(
                    token,
                    PlotError::NoData("routine produced no figures".to_string()),
                ));
            }
            (Arity::Multi, Constructed::Multi(figures)) => figures
                .into_iter()
                .map(|(key, figure)| (format!("{base}_{key}"), figure))
                .collect(),
            (Arity::Single, Constructed::Multi(figures)) => {
                return Err(PlotError::construction(
                    token,
                    PlotError::Render(format!(
                        "expected one figure, routine produced {}",
                        figures.len()
                    )),
                ));
            }
        };

        Ok(figures
            .into_iter()
            .map(|(stem, figure)| (stem, FigureStyler::apply(figure, style)))
            .collect())
    }
}
