//! Plot-type catalog: maps request tokens onto construction routines.
//!
//! A token is a family code followed by its arguments, e.g. `Bpa` is the
//! boxplot family `B` with metric `p` (PCE) grouped by `a` (sample). Families
//! declare which arguments they take through [`ArgSpec`]; the catalog owns the
//! parsing so every family reads arguments the same way.

use indexmap::IndexMap;

use super::chart::{BoxplotConstructor, CombinedGridConstructor, HistogramConstructor, RecordSource};
use super::colors::Color;
use super::figure::Figure;
use super::jv_curves::{
    BestDeviceConstructor, BestPerConditionConstructor, CurveSubset, CurveSubsetConstructor,
    Separation, SeparatedCurvesConstructor,
};
use crate::error::{PlotError, Result};
use crate::types::{GroupBy, MeasurementDataset, Metric, SupportData};

/// Arguments a family code accepts after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSpec {
    /// Nothing may follow the code
    None,
    /// Exactly one metric letter
    Metric,
    /// Exactly one group letter
    Grouping,
    /// One metric letter followed by one or more group letters
    MetricAndGrouping,
}

impl ArgSpec {
    /// Parse the part of a token after the family code.
    pub fn parse(self, rest: &str) -> Option<PlotArgs> {
        let mut chars = rest.chars();
        match self {
            ArgSpec::None => rest.is_empty().then(PlotArgs::default),
            ArgSpec::Metric => {
                let metric = Metric::from_code(chars.next()?)?;
                chars.next().is_none().then(|| PlotArgs::metric_only(metric))
            }
            ArgSpec::Grouping => {
                let group = GroupBy::from_code(chars.next()?)?;
                chars.next().is_none().then(|| PlotArgs {
                    metric: None,
                    groups: vec![group],
                })
            }
            ArgSpec::MetricAndGrouping => {
                let metric = Metric::from_code(chars.next()?)?;
                let groups = chars.map(GroupBy::from_code).collect::<Option<Vec<_>>>()?;
                (!groups.is_empty()).then_some(PlotArgs {
                    metric: Some(metric),
                    groups,
                })
            }
        }
    }

    /// Argument pattern shown in token listings.
    pub fn pattern(self) -> &'static str {
        match self {
            ArgSpec::None => "",
            ArgSpec::Metric => "<metric>",
            ArgSpec::Grouping => "<group>",
            ArgSpec::MetricAndGrouping => "<metric><group>...",
        }
    }
}

/// Parsed token arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotArgs {
    pub metric: Option<Metric>,
    pub groups: Vec<GroupBy>,
}

impl PlotArgs {
    pub fn metric_only(metric: Metric) -> Self {
        Self {
            metric: Some(metric),
            groups: Vec::new(),
        }
    }

    pub fn require_metric(&self) -> Result<Metric> {
        self.metric.ok_or(PlotError::MissingField("metric"))
    }

    pub fn require_group(&self) -> Result<GroupBy> {
        self.groups
            .first()
            .copied()
            .ok_or(PlotError::MissingField("group"))
    }
}

/// Whether a resolved token yields one figure or a variable number of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    Multi,
}

/// Limits and switches for construction routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Split boxplots into reverse and forward scans
    pub separate_scan_direction: bool,
    /// Maximum number of devices drawn in a combined curve plot
    pub max_curves: usize,
    /// Maximum number of per-device figures
    pub max_devices: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            separate_scan_direction: false,
            max_curves: 50,
            max_devices: 20,
        }
    }
}

/// Everything a construction routine may read.
#[derive(Debug, Clone, Copy)]
pub struct PlotContext<'a> {
    pub args: &'a PlotArgs,
    pub dataset: &'a MeasurementDataset,
    pub support: &'a SupportData,
    /// Color scheme of the render call
    pub colors: &'a [Color],
    pub options: &'a RenderOptions,
}

impl PlotContext<'_> {
    /// Fails when any requested grouping is by condition and the samples carry
    /// no condition assignments.
    pub fn check_groups(&self) -> Result<()> {
        if self.args.groups.contains(&GroupBy::Condition) && !self.support.has_conditions {
            return Err(PlotError::MissingConditions);
        }
        Ok(())
    }
}

/// Output of a construction routine.
#[derive(Debug, Clone)]
pub enum Constructed {
    Single(Figure),
    /// Figures keyed by what distinguishes them (device, substrate, facet)
    Multi(Vec<(String, Figure)>),
}

impl Constructed {
    pub fn len(&self) -> usize {
        match self {
            Constructed::Single(_) => 1,
            Constructed::Multi(figures) => figures.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A figure construction routine for one family code.
pub trait PlotConstructor: Send + Sync {
    /// Descriptive part of the figure name, e.g. `PCE_by_sample`.
    fn label(&self, args: &PlotArgs) -> String;

    fn args(&self) -> ArgSpec;

    fn arity(&self, _args: &PlotArgs) -> Arity {
        Arity::Single
    }

    fn construct(&self, ctx: &PlotContext<'_>) -> Result<Constructed>;
}

/// A token matched to its routine.
pub struct Resolved<'c> {
    pub code: &'c str,
    pub args: PlotArgs,
    pub constructor: &'c dyn PlotConstructor,
}

impl Resolved<'_> {
    pub fn label(&self) -> String {
        self.constructor.label(&self.args)
    }

    pub fn arity(&self) -> Arity {
        self.constructor.arity(&self.args)
    }
}

/// One row of the token listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub code: String,
    pub pattern: &'static str,
    /// Target token, for aliases
    pub alias_of: Option<String>,
}

/// Registry of family codes and aliases.
#[derive(Default)]
pub struct PlotCatalog {
    constructors: IndexMap<String, Box<dyn PlotConstructor>>,
    aliases: IndexMap<String, String>,
}

impl PlotCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard JV analysis vocabulary.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        let entries: Vec<(&str, Box<dyn PlotConstructor>)> = vec![
            ("B", Box::new(BoxplotConstructor::new(RecordSource::Filtered))),
            ("J", Box::new(BoxplotConstructor::new(RecordSource::Omitted))),
            ("Ball", Box::new(CombinedGridConstructor::new(RecordSource::Filtered))),
            ("Jall", Box::new(CombinedGridConstructor::new(RecordSource::Omitted))),
            ("H", Box::new(HistogramConstructor)),
            ("Cy", Box::new(CurveSubsetConstructor::new(CurveSubset::All))),
            ("Cz", Box::new(CurveSubsetConstructor::new(CurveSubset::Working))),
            ("Co", Box::new(CurveSubsetConstructor::new(CurveSubset::Rejected))),
            ("Cw", Box::new(BestDeviceConstructor)),
            ("Cb", Box::new(BestPerConditionConstructor)),
            ("Cx", Box::new(SeparatedCurvesConstructor::new(Separation::Device, false))),
            ("Cxw", Box::new(SeparatedCurvesConstructor::new(Separation::Device, true))),
            ("Cd", Box::new(SeparatedCurvesConstructor::new(Separation::Substrate, false))),
            ("Cdw", Box::new(SeparatedCurvesConstructor::new(Separation::Substrate, true))),
        ];
        for (code, constructor) in entries {
            catalog.constructors.insert(code.to_string(), constructor);
        }
        catalog.aliases.insert("Hist".to_string(), "Hp".to_string());
        catalog
    }

    /// Register a family code. Fails on an empty or already used code.
    pub fn register(
        &mut self,
        code: impl Into<String>,
        constructor: impl PlotConstructor + 'static,
    ) -> Result<()> {
        let code = code.into();
        if code.is_empty() || code.chars().any(char::is_whitespace) {
            return Err(PlotError::InvalidPlotCode(code));
        }
        if self.constructors.contains_key(&code) || self.aliases.contains_key(&code) {
            return Err(PlotError::DuplicatePlotType(code));
        }
        self.constructors.insert(code, Box::new(constructor));
        Ok(())
    }

    /// Make `alias` stand for `token`. The alias follows the same rules as a
    /// family code and the target must already resolve.
    pub fn register_alias(&mut self, alias: impl Into<String>, token: impl Into<String>) -> Result<()> {
        let alias = alias.into();
        let token = token.into();
        if alias.is_empty() || alias.chars().any(char::is_whitespace) {
            return Err(PlotError::InvalidPlotCode(alias));
        }
        if self.aliases.contains_key(&alias) || self.constructors.contains_key(&alias) {
            return Err(PlotError::DuplicatePlotType(alias));
        }
        if self.resolve_direct(&token).is_none() {
            return Err(PlotError::InvalidPlotCode(format!("{alias} -> {token}")));
        }
        self.aliases.insert(alias, token);
        Ok(())
    }

    /// Match `token` to its routine and arguments.
    pub fn resolve(&self, token: &str) -> Result<Resolved<'_>> {
        let target = self.aliases.get(token).map_or(token, String::as_str);
        self.resolve_direct(target)
            .ok_or_else(|| PlotError::UnknownPlotType(token.to_string()))
    }

    fn resolve_direct(&self, token: &str) -> Option<Resolved<'_>> {
        let mut codes: Vec<(&String, &Box<dyn PlotConstructor>)> = self.constructors.iter().collect();
        // Stable sort keeps registration order among codes of equal length
        codes.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));

        codes.into_iter().find_map(|(code, constructor)| {
            let rest = token.strip_prefix(code.as_str())?;
            let args = constructor.args().parse(rest)?;
            Some(Resolved {
                code: code.as_str(),
                args,
                constructor: constructor.as_ref(),
            })
        })
    }

    pub fn contains(&self, token: &str) -> bool {
        self.resolve(token).is_ok()
    }

    /// Family codes followed by aliases, in registration order.
    pub fn tokens(&self) -> Vec<TokenInfo> {
        let families = self.constructors.iter().map(|(code, constructor)| TokenInfo {
            code: code.clone(),
            pattern: constructor.args().pattern(),
            alias_of: None,
        });
        let aliases = self.aliases.iter().map(|(alias, target)| TokenInfo {
            code: alias.clone(),
            pattern: "",
            alias_of: Some(target.clone()),
        });
        families.chain(aliases).collect()
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl std::fmt::Debug for PlotCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlotCatalog")
            .field("codes", &self.constructors.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixed;

    impl PlotConstructor for Fixed {
        fn label(&self, _args: &PlotArgs) -> String {
            "fixed".into()
        }

        fn args(&self) -> ArgSpec {
            ArgSpec::None
        }

        fn construct(&self, _ctx: &PlotContext<'_>) -> Result<Constructed> {
            Ok(Constructed::Single(Figure::placeholder("fixed")))
        }
    }

    #[test]
    fn test_arg_parsing() {
        assert_eq!(ArgSpec::None.parse(""), Some(PlotArgs::default()));
        assert_eq!(ArgSpec::None.parse("w"), None);
        assert_eq!(ArgSpec::Metric.parse("p"), Some(PlotArgs::metric_only(Metric::Pce)));
        assert_eq!(ArgSpec::Metric.parse("pa"), None);
        assert_eq!(ArgSpec::Metric.parse("a"), None);
        assert_eq!(
            ArgSpec::MetricAndGrouping.parse("vgc"),
            Some(PlotArgs {
                metric: Some(Metric::Voc),
                groups: vec![GroupBy::Condition, GroupBy::Direction],
            })
        );
        assert_eq!(ArgSpec::MetricAndGrouping.parse("p"), None);
        assert_eq!(ArgSpec::MetricAndGrouping.parse("pz"), None);
        assert_eq!(ArgSpec::Grouping.parse("b").unwrap().groups, vec![GroupBy::Cell]);
    }

    #[test]
    fn test_standard_resolution() {
        let catalog = PlotCatalog::standard();
        let cases = [
            ("Bpa", "B"),
            ("Jfg", "J"),
            ("Balla", "Ball"),
            ("Jallc", "Jall"),
            ("Hv", "H"),
            ("Cx", "Cx"),
            ("Cxw", "Cxw"),
            ("Cdw", "Cdw"),
            ("Hist", "H"),
        ];
        for (token, code) in cases {
            let resolved = catalog.resolve(token).unwrap();
            assert_eq!(resolved.code, code, "{token}");
        }
        assert_eq!(catalog.resolve("Hist").unwrap().label(), "PCE_histogram");
    }

    #[test]
    fn test_unknown_tokens() {
        let catalog = PlotCatalog::standard();
        for token in ["", "unknown_code", "Bp", "Cxx", "Hpp", "B pa"] {
            match catalog.resolve(token) {
                Err(PlotError::UnknownPlotType(t)) => assert_eq!(t, token),
                Err(other) => panic!("unexpected error {other:?}"),
                Ok(r) => panic!("{token} resolved to {}", r.code),
            }
        }
    }

    #[test]
    fn test_arity_depends_on_group_count() {
        let catalog = PlotCatalog::standard();
        assert_eq!(catalog.resolve("Bpa").unwrap().arity(), Arity::Single);
        assert_eq!(catalog.resolve("Bpac").unwrap().arity(), Arity::Multi);
        assert_eq!(catalog.resolve("Cd").unwrap().arity(), Arity::Multi);
        assert_eq!(catalog.resolve("Cw").unwrap().arity(), Arity::Single);
    }

    #[test]
    fn test_register_rejects_duplicates_and_empty() {
        let mut catalog = PlotCatalog::standard();
        assert!(matches!(
            catalog.register("Cy", Fixed),
            Err(PlotError::DuplicatePlotType(code)) if code == "Cy"
        ));
        assert!(matches!(catalog.register("", Fixed), Err(PlotError::InvalidPlotCode(_))));
        assert!(matches!(
            catalog.register("Hist", Fixed),
            Err(PlotError::DuplicatePlotType(_))
        ));

        catalog.register("Q", Fixed).unwrap();
        assert_eq!(catalog.resolve("Q").unwrap().label(), "fixed");
        assert_eq!(catalog.tokens().iter().filter(|t| t.alias_of.is_none()).last().unwrap().code, "Q");
    }

    #[test]
    fn test_aliases() {
        let mut catalog = PlotCatalog::standard();
        catalog.register_alias("best", "Cw").unwrap();
        assert_eq!(catalog.resolve("best").unwrap().code, "Cw");
        assert!(matches!(
            catalog.register_alias("best", "Cy"),
            Err(PlotError::DuplicatePlotType(_))
        ));
        assert!(matches!(
            catalog.register_alias("nowhere", "Zz"),
            Err(PlotError::InvalidPlotCode(_))
        ));
        for bad in ["", " ", "my best", "best\t"] {
            assert!(
                matches!(catalog.register_alias(bad, "Cw"), Err(PlotError::InvalidPlotCode(_))),
                "{bad:?} should be rejected"
            );
        }

        let listed: Vec<(String, Option<String>)> = catalog
            .tokens()
            .into_iter()
            .filter(|t| t.alias_of.is_some())
            .map(|t| (t.code, t.alias_of))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("Hist".to_string(), Some("Hp".to_string())),
                ("best".to_string(), Some("Cw".to_string())),
            ]
        );
    }

    #[test]
    fn test_longer_code_wins() {
        let mut catalog = PlotCatalog::new();
        catalog.register("C", Fixed).unwrap();
        catalog.register("Cx", Fixed).unwrap();
        assert_eq!(catalog.resolve("Cx").unwrap().code, "Cx");
        assert_eq!(catalog.resolve("C").unwrap().code, "C");
    }
}
