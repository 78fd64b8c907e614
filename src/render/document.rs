use handlebars::Handlebars;

use super::html::GridView;
use super::{Artifact, ArtifactFormat, RenderResult, Renderer};
use crate::grid::AgendaGrid;

const DOCUMENT_TEMPLATE: &str = "document";

// Word opens HTML carrying the Office namespaces as a native document; the
// `Section1` page rule switches it to landscape.
const DOCUMENT_SOURCE: &str = r#"<html xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:w="urn:schemas-microsoft-com:office:word" xmlns="http://www.w3.org/TR/REC-html40">
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View><w:Zoom>100</w:Zoom></w:WordDocument></xml><![endif]-->
<style>
@page Section1 { size: 841.9pt 595.3pt; mso-page-orientation: landscape; margin: 36pt; }
div.Section1 { page: Section1; }
table.agenda { border-collapse: collapse; width: 100%; }
table.agenda th, table.agenda td { border: 1px solid #444444; padding: 4pt; vertical-align: top; }
td.doc-break { background: #eeeeee; text-align: center; font-style: italic; }
</style>
</head>
<body>
<div class="Section1">
<h1 class="doc-title">{{title}}</h1>
{{#if subtitle}}<h2 class="doc-subtitle">{{subtitle}}</h2>{{/if}}
<p class="doc-dates">{{date_range}}</p>
<table class="agenda">
<tr><th>Time</th>{{#each days}}<th>{{this}}</th>{{/each}}</tr>
{{#each rows}}
<tr>
<td class="doc-time">{{time_label}}</td>
{{#each cells}}
{{#if is_break}}<td class="doc-break"><p class="doc-break-name">{{heading}}</p></td>{{else}}<td class="doc-session"><p class="doc-session-title"><b>{{heading}}</b></p>{{#each bullets}}<p class="doc-bullet">&#8226; {{this}}</p>{{/each}}{{#if trainer}}<p class="doc-trainer"><i>Trainer: {{trainer}}</i></p>{{/if}}</td>{{/if}}
{{/each}}
</tr>
{{/each}}
</table>
</div>
</body>
</html>
"#;

/// Single styled document for word-processor export.
pub struct StyledDocumentRenderer {
    registry: Handlebars<'static>,
}

impl StyledDocumentRenderer {
    pub fn new() -> RenderResult<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(DOCUMENT_TEMPLATE, DOCUMENT_SOURCE)?;
        Ok(Self { registry })
    }
}

impl Renderer for StyledDocumentRenderer {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::StyledDocument
    }

    fn render(&self, grid: &AgendaGrid) -> RenderResult<Artifact> {
        grid.check_shape()?;
        let document = self
            .registry
            .render(DOCUMENT_TEMPLATE, &GridView::from_grid(grid))?;
        tracing::info!(
            rows = grid.rows.len(),
            days = grid.num_days(),
            bytes = document.len(),
            "rendered styled document"
        );
        Ok(Artifact::text(self.format(), document))
    }
}
