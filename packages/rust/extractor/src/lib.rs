//! Skill record extraction from assessment-report pages.
//!
//! For every page in the item-level scores range the extractor reads both the
//! page's tables and its plain text and turns each recognisable row or line
//! into a [`SkillRecord`]:
//!
//! 1. tabular path: rows dispatched through [`ROW_SHAPES`]
//! 2. text path: `label | skill | mastery` lines
//! 3. common normalisation: domain/subdomain label, mastery status, skill
//!    length, reference age lookup
//!
//! Both paths always run and their output is not deduplicated: a skill that
//! appears in a table and in the page text yields two records.

mod diagnostics;
mod fields;
mod shapes;

use tracing::{debug, info, instrument, trace, warn};

use skillmap_document::{Page, PageSource, Table};
use skillmap_labels::SubdomainAliasTable;
use skillmap_reference::{ReferenceDictionary, ReferenceMatcher};
use skillmap_shared::{ExtractionSettings, MatchSettings, Result, ResultSet, SkillRecord};

pub use diagnostics::{DropReason, ExtractionDiagnostics, SourcePath};
pub use fields::{RowFields, classify_mastery, parse_label};
pub use shapes::{ROW_SHAPES, RowShape};

/// Output of one extraction run.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub results: ResultSet,
    pub diagnostics: ExtractionDiagnostics,
}

/// Notified after each page has been processed.
pub trait PageObserver {
    fn page_extracted(&self, index: usize, records_added: usize);
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl PageObserver for NoopObserver {
    fn page_extracted(&self, _index: usize, _records_added: usize) {}
}

/// Walks a document's item-level pages and builds a [`ResultSet`].
///
/// Holds only shared, read-only references; every call to
/// [`extract`](Self::extract) builds its own results and diagnostics.
pub struct Extractor<'a> {
    aliases: &'a SubdomainAliasTable,
    matcher: ReferenceMatcher<'a>,
    settings: ExtractionSettings,
}

/// Mutable state for one run.
#[derive(Default)]
struct RunState {
    results: ResultSet,
    diagnostics: ExtractionDiagnostics,
}

impl<'a> Extractor<'a> {
    pub fn new(
        aliases: &'a SubdomainAliasTable,
        reference: &'a ReferenceDictionary,
        settings: ExtractionSettings,
        match_settings: MatchSettings,
    ) -> Self {
        Self {
            aliases,
            matcher: ReferenceMatcher::new(reference, match_settings),
            settings,
        }
    }

    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    /// Extract all skills from the configured page range.
    pub fn extract(&self, source: &dyn PageSource) -> Result<Extraction> {
        self.extract_with(source, &NoopObserver)
    }

    /// Like [`extract`](Self::extract), reporting each processed page.
    ///
    /// A page that cannot be read fails the whole run; no partial results
    /// are returned.
    #[instrument(skip_all, fields(source = source.name()))]
    pub fn extract_with(
        &self,
        source: &dyn PageSource,
        observer: &dyn PageObserver,
    ) -> Result<Extraction> {
        self.settings.validate()?;

        let page_count = source.page_count();
        let mut state = RunState::default();

        for index in self.settings.first_page..self.settings.end_page {
            if index >= page_count {
                debug!(index, page_count, "page range runs past document end");
                break;
            }

            let page = source.page(index)?;
            let before = state.diagnostics.records();
            self.extract_page(&page, &mut state);
            let added = state.diagnostics.records() - before;

            debug!(index, tables = page.tables.len(), records = added, "page extracted");
            observer.page_extracted(index, added);
        }

        info!(
            records = state.diagnostics.records(),
            pages = state.diagnostics.pages_visited,
            dropped = state.diagnostics.dropped_total(),
            unmatched = state.diagnostics.unmatched_count(),
            "extraction complete"
        );

        Ok(Extraction {
            results: state.results,
            diagnostics: state.diagnostics,
        })
    }

    /// Table path first, then text path.
    fn extract_page(&self, page: &Page, state: &mut RunState) {
        state.diagnostics.pages_visited += 1;
        if page.is_blank() {
            trace!("blank page");
            return;
        }

        if !page.tables.is_empty() {
            state.diagnostics.pages_with_tables += 1;
            for table in &page.tables {
                self.extract_table(table, state);
            }
        }

        if let Some(text) = page.text.as_deref().filter(|t| !t.trim().is_empty()) {
            state.diagnostics.pages_with_text += 1;
            self.extract_text(text, state);
        }
    }

    fn extract_table(&self, table: &Table, state: &mut RunState) {
        for row in table {
            if row.len() < 2 {
                continue;
            }
            state.diagnostics.table_rows_seen += 1;

            let cells = shapes::clean_cells(row);
            let Some((shape, fields)) =
                shapes::dispatch(&cells, self.settings.label_continuation_max_len)
            else {
                state.diagnostics.drop_row(DropReason::Shape);
                continue;
            };

            if fields::is_header(&fields) {
                state.diagnostics.drop_row(DropReason::Header);
                continue;
            }

            trace!(?shape, label = %fields.label, "row shape matched");
            self.accept(&fields, SourcePath::Table, state);
        }
    }

    fn extract_text(&self, text: &str, state: &mut RunState) {
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || !line.contains('|') {
                continue;
            }
            state.diagnostics.text_lines_seen += 1;

            if line.to_uppercase().contains("DOMAIN") {
                state.diagnostics.drop_row(DropReason::Header);
                continue;
            }

            let parts: Vec<&str> = line.split('|').map(str::trim).collect();
            if parts.len() < 3 {
                state.diagnostics.drop_row(DropReason::Shape);
                continue;
            }

            let fields = RowFields::new(parts[0], parts[1], parts[2]);
            self.accept(&fields, SourcePath::Text, state);
        }
    }

    /// Common normalisation; appends a record or counts the drop.
    fn accept(&self, fields: &RowFields, path: SourcePath, state: &mut RunState) {
        match self.build_record(fields, state) {
            Ok(record) => {
                state
                    .diagnostics
                    .record_kept(path, record.tier, &record.skill);
                state.results.push(record);
            }
            Err(reason) => state.diagnostics.drop_row(reason),
        }
    }

    fn build_record(
        &self,
        fields: &RowFields,
        state: &mut RunState,
    ) -> std::result::Result<SkillRecord, DropReason> {
        let (domain, raw_subdomain) =
            parse_label(&fields.label).ok_or(DropReason::UnrecognizedLabel)?;

        let subdomain = self.aliases.normalize(raw_subdomain);
        let mastery = classify_mastery(&fields.mastery).ok_or(DropReason::MissingMastery)?;

        if fields.skill.chars().count() <= self.settings.min_skill_len {
            return Err(DropReason::ShortSkill);
        }

        if !self.aliases.is_canonical(&subdomain) {
            warn!(%domain, label = raw_subdomain, "subdomain label not recognised, kept as-is");
            state.diagnostics.unresolved_subdomain(&subdomain);
        }

        let matched = self.matcher.match_skill(&fields.skill);
        if matched.age.is_unmatched() {
            warn!(skill = %fields.skill, %domain, %subdomain, "skill has no reference age");
        }

        Ok(SkillRecord {
            skill: fields.skill.clone(),
            domain,
            subdomain,
            mastery,
            age: matched.age,
            tier: matched.tier,
        })
    }
}
