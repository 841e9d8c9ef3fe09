//! CSV report format
//!
//! One row per fitted component, for spreadsheet analysis.

use crate::pipeline::AnalysisReport;

/// CSV record for one component
#[derive(Debug, Clone, PartialEq)]
pub struct CsvComponent {
    pub component: String,
    pub parent: String,
    pub child: String,
    pub property: String,
    pub function: String,
    pub complexity: String,
    pub r_squared: f64,
    pub parameter: f64,
    pub mean_time_ms: Option<f64>,
}

/// CSV output formatter
#[derive(Debug, Default)]
pub struct CsvOutput {
    components: Vec<CsvComponent>,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_report(report: &AnalysisReport) -> Self {
        let mut output = Self::new();
        for analysis in &report.components {
            let best = analysis.best();
            let mean_time_ms = report
                .treemap
                .iter()
                .find(|t| t.node.component == analysis.component)
                .map(|t| t.node.mean_millis);

            output.add_component(CsvComponent {
                component: analysis.component.to_string(),
                parent: analysis.component.parent().to_string(),
                child: analysis.component.leaf().to_string(),
                property: analysis.property.clone(),
                function: best.function.label().to_string(),
                complexity: best.label(),
                r_squared: best.r_squared,
                parameter: best.parameter,
                mean_time_ms,
            });
        }
        output
    }

    pub fn add_component(&mut self, component: CsvComponent) {
        self.components.push(component);
    }

    fn header() -> &'static str {
        "component,parent,child,property,function,complexity,r2,parameter,mean_time_ms"
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_component(component: &CsvComponent) -> String {
        let fields = [
            Self::escape_field(&component.component),
            Self::escape_field(&component.parent),
            Self::escape_field(&component.child),
            Self::escape_field(&component.property),
            component.function.clone(),
            Self::escape_field(&component.complexity),
            component.r_squared.to_string(),
            component.parameter.to_string(),
            component
                .mean_time_ms
                .map(|t| format!("{:.6}", t))
                .unwrap_or_default(),
        ];
        fields.join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(Self::header());
        output.push('\n');

        for component in &self.components {
            output.push_str(&Self::format_component(component));
            output.push('\n');
        }

        output
    }
}
