//! Handlebars rendering of the narrative report

use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

const REPORT_TEMPLATE_NAME: &str = "report";

/// Renders the accomplishment report from a Handlebars template
pub struct ReportRenderer {
    handlebars: Handlebars<'static>,
}

impl ReportRenderer {
    /// Create a renderer with the built-in template
    pub fn new() -> Result<Self> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    /// Create a renderer with a template read from `path`
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report template {}", path.display()))?;
        Self::from_source(&source)
            .with_context(|| format!("Invalid report template {}", path.display()))
    }

    fn from_source(source: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // Markdown output, nothing to escape
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        handlebars.register_template_string(REPORT_TEMPLATE_NAME, source)?;
        Ok(Self { handlebars })
    }

    /// Render the report with the given data
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        let result = self.handlebars.render(REPORT_TEMPLATE_NAME, data)?;
        Ok(result)
    }
}

/// Built-in accomplishment report template (Markdown)
pub const DEFAULT_TEMPLATE: &str = r#"# Accomplishment Report

**Cutoff period:** {{cutoff_dates}}
**Cutoff no.:** {{tc}}
**Generated on:** {{generated_on}}

| | Name | Position |
|---|---|---|
| Prepared by | {{developer_name}} | {{developer_position}} |
| Reviewed by | {{reviewer_name}} | {{reviewer_position}} |

{{#each projects}}
## {{name}}

{{details}}

### Modules
{{#each modules}}
- {{this}}
{{/each}}

### Accomplishments
{{#each rendered_tasks}}
{{#if tasks}}
#### {{date}}
{{#each tasks}}
- **{{title}}** ({{module_label}}, {{status}}){{#if date_started}} started {{date_started}}{{/if}}{{#if date_completed}}, completed {{date_completed}}{{/if}}
{{/each}}
{{/if}}
{{/each}}

#### Other tasks
{{#each tasks}}
- **{{title}}** ({{module_label}}, {{status}}){{#if date_started}} started {{date_started}}{{/if}}{{#if date_completed}}, completed {{date_completed}}{{/if}}
{{else}}
- None
{{/each}}

### Progress
| High priority | Moderate priority | Low priority | On hold | In progress | Done | Total | Completion |
|---|---|---|---|---|---|---|---|
| {{statistics.high_priority}} | {{statistics.moderate_priority}} | {{statistics.low_priority}} | {{statistics.counts.on_hold}} | {{statistics.counts.in_progress}} | {{statistics.counts.done}} | {{statistics.total}} | {{statistics.completion}} |

### Actual timeline
![Actual timeline](<{{actual_timeline}}>)

### Projected timeline
![Projected timeline](<{{projected_timeline}}>)

{{#each projected_spans}}
- {{module}}: {{start}} to {{end}} ({{points_sum}} points, {{working_days}} working days + {{rest_days}} rest days)
{{/each}}

{{#if images}}
### Screenshots
{{#each images}}
![{{caption}}](<{{link}}>)
{{/each}}
{{/if}}
{{/each}}
"#;
