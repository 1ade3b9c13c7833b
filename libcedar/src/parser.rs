use crate::checklist::{Checklist, ChecklistItem, ItemStatus, Priority};
use crate::settings::Settings;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use pest::iterators::Pair;
use pest::Parser;
use tracing::{debug, warn};

use std::fs;
use std::path::Path;

#[derive(Parser)]
#[grammar = "checklist.pest"]
pub struct ChecklistParser;

/// Everything read from one checklist document.
#[derive(Debug, Default)]
pub struct Document {
    pub settings: Settings,
    pub checklists: Vec<Checklist>,
}

impl Document {
    pub fn new() -> Document {
        Default::default()
    }

    pub fn checklist(&self, title: &str) -> Option<&Checklist> {
        self.checklists.iter().find(|c| c.title == title)
    }
}

pub fn parse_file(path: &Path) -> Result<Document> {
    let fcontent = fs::read_to_string(path)
        .map_err(|e| anyhow!(format!("cannot read `{}': {}", path.display(), e)))?;
    parse(&fcontent)
}

pub fn parse(input: &str) -> Result<Document> {
    let document = ChecklistParser::parse(Rule::document, input)?
        .next()
        .ok_or(anyhow!("empty document"))?;
    let mut doc = Document::new();

    for entry in document.into_inner() {
        match entry.as_rule() {
            Rule::option => parse_option(&mut doc.settings, entry)?,
            Rule::checklist => doc.checklists.push(parse_checklist(entry)?),
            Rule::EOI => {}
            _ => return Err(anyhow!(format!("unexpected token: {}", entry.as_str()))),
        };
    }

    debug!(checklists = doc.checklists.len(), "parsed checklist document");
    Ok(doc)
}

fn parse_option(settings: &mut Settings, token: Pair<Rule>) -> Result<()> {
    let mut option = token.into_inner();
    let key = inner_str(
        option
            .next()
            .ok_or(anyhow!(format!("invalid next token: {}", option.as_str())))?,
    );
    let val = inner_str(
        option
            .next()
            .ok_or(anyhow!(format!("invalid next token: {}", option.as_str())))?,
    );
    settings.set_option(key, val).inspect_err(|e| {
        warn!(key, val, "rejected option: {}", e);
    })
}

fn parse_checklist(token: Pair<Rule>) -> Result<Checklist> {
    let mut pairs = token.into_inner();
    let header = pairs
        .next()
        .ok_or(anyhow!("invalid next token, expected checklist header"))?;

    let mut header_pairs = header.into_inner();
    let mut checklist = Checklist::new(inner_str(
        header_pairs
            .next()
            .ok_or(anyhow!("invalid next token, expected checklist title"))?,
    ));
    for field in header_pairs {
        match field.as_rule() {
            Rule::company => checklist.company = Some(field_str(field)?.to_string()),
            Rule::fiscal_year => checklist.fiscal_year = Some(field_str(field)?.to_string()),
            _ => return Err(anyhow!(format!("unexpected token: {}", field.as_str()))),
        }
    }

    for item in pairs {
        checklist.items.push(parse_item(item)?);
    }
    checklist.recompute();

    Ok(checklist)
}

fn parse_status(mark: &str) -> Result<ItemStatus> {
    match mark {
        "[x]" => Ok(ItemStatus::Completed),
        "[~]" => Ok(ItemStatus::InProgress),
        "[ ]" => Ok(ItemStatus::Pending),
        "[-]" => Ok(ItemStatus::NotApplicable),
        _ => Err(anyhow!(format!("invalid item status mark `{}'", mark))),
    }
}

fn parse_item(token: Pair<Rule>) -> Result<ChecklistItem> {
    let line = token.as_str().to_string();
    let mut pairs = token.into_inner();
    let status = parse_status(
        pairs
            .next()
            .ok_or(anyhow!(format!("invalid item: {}", line)))?
            .as_str(),
    )?;
    let title = inner_str(
        pairs
            .next()
            .ok_or(anyhow!(format!("invalid item, expected title: {}", line)))?,
    );
    let mut item = ChecklistItem::new(title, status);

    for field in pairs {
        match field.as_rule() {
            Rule::description => item.description = Some(field_str(field)?.to_string()),
            Rule::priority => item.priority = Priority::try_from(field.as_str())?,
            Rule::stamp => {
                let mut stamp = field.into_inner();
                let date = stamp
                    .next()
                    .ok_or(anyhow!(format!("invalid stamp, expected date: {}", line)))?
                    .as_str();
                item.completion_date = Some(NaiveDate::parse_from_str(date, "%Y-%m-%d")?);
                item.completed_by = Some(
                    inner_str(
                        stamp
                            .next()
                            .ok_or(anyhow!(format!("invalid stamp, expected user: {}", line)))?,
                    )
                    .to_string(),
                );
            }
            Rule::note => item.notes = Some(field_str(field)?.to_string()),
            _ => return Err(anyhow!(format!("unexpected token: {}", field.as_str()))),
        }
    }

    if item.is_stamped() && item.status != ItemStatus::Completed {
        warn!(item = %item.item, status = %item.status, "completion stamp on an unfinished item");
    }

    Ok(item)
}

/// Text of a `keyword "value"` pair.
fn field_str(token: Pair<Rule>) -> Result<&str> {
    let rule = token.as_rule();
    token
        .into_inner()
        .next()
        .map(inner_str)
        .ok_or(anyhow!(format!("invalid {:?}, expected string", rule)))
}

/// Contents of a quoted string.
pub fn inner_str(token: Pair<Rule>) -> &str {
    let span = token.as_str();
    token
        .into_inner()
        .next()
        .map(|inner| inner.as_str())
        .unwrap_or(span)
}

#[cfg(test)]
mod tests {
    use crate::checklist::{ChecklistStatus, ItemStatus, Priority};
    use crate::parser::{parse, parse_file, ChecklistParser, Rule};
    use crate::settings::Lang;
    use anyhow::{anyhow, Result};
    use chrono::NaiveDate;
    use pest::Parser;
    use pretty_assertions::assert_eq;

    use std::io::Write;

    const SAMPLE: &str = r#"; year end
option "lang" "ar"
option "lbp_symbol" "LL"

checklist "Year-end audit" company "Cedar Trading SAL" fiscal_year "2023"
  [x] "Bank reconciliation" high on 2024-01-10 by "rima@cedar.lb" note "signed off"
  [~] "Payroll review" medium
  ; still waiting on the ministry
  [ ] "VAT returns" description "Q4 filings"
  [-] "Inventory count" low

checklist "Opening balances"
"#;

    #[test]
    fn parse_status_marks() -> Result<()> {
        for (input, rule) in [("[x]", Rule::status), ("[ ]", Rule::status), ("[-]", Rule::status)] {
            let pair = ChecklistParser::parse(rule, input)?
                .next()
                .ok_or(anyhow!("empty ast"))?;
            assert_eq!(pair.as_str(), input);
        }
        assert!(ChecklistParser::parse(Rule::status, "[?]").is_err());
        Ok(())
    }

    #[test]
    fn parse_document() -> Result<()> {
        let doc = parse(SAMPLE)?;

        assert_eq!(doc.settings.lang, Lang::Ar);
        assert_eq!(doc.settings.lbp_symbol, "LL");
        assert_eq!(doc.checklists.len(), 2);

        let audit = doc
            .checklist("Year-end audit")
            .ok_or(anyhow!("missing checklist"))?;
        assert_eq!(audit.company.as_deref(), Some("Cedar Trading SAL"));
        assert_eq!(audit.fiscal_year.as_deref(), Some("2023"));
        assert_eq!(audit.items().len(), 4);
        assert_eq!(audit.status(), ChecklistStatus::InProgress);
        assert_eq!(audit.completion_percentage(), 50);

        let bank = &audit.items()[0];
        assert_eq!(bank.item, "Bank reconciliation");
        assert_eq!(bank.status, ItemStatus::Completed);
        assert_eq!(bank.priority, Priority::High);
        assert_eq!(bank.completion_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(bank.completed_by.as_deref(), Some("rima@cedar.lb"));
        assert_eq!(bank.notes.as_deref(), Some("signed off"));

        let vat = &audit.items()[2];
        assert_eq!(vat.status, ItemStatus::Pending);
        assert_eq!(vat.priority, Priority::Medium);
        assert_eq!(vat.description.as_deref(), Some("Q4 filings"));

        let opening = doc
            .checklist("Opening balances")
            .ok_or(anyhow!("missing checklist"))?;
        assert!(opening.items().is_empty());
        assert_eq!(opening.status(), ChecklistStatus::Pending);
        Ok(())
    }

    #[test]
    fn parse_errors() {
        assert!(parse(r#"checklist "a"
  [x] "unterminated"#)
        .is_err());
        assert!(parse(r#"option "lang" "fr""#).is_err());
        assert!(parse(r#"option "currency_precision" "70000""#).is_err());
        assert!(parse(r#"checklist "a"
  [x] "b" on 2024-13-01 by "someone""#)
        .is_err());
        assert!(parse("  [x] \"orphan item\"").is_err());
    }

    #[test]
    fn parse_empty_document() -> Result<()> {
        let doc = parse("")?;
        assert!(doc.checklists.is_empty());
        let doc = parse("\n; nothing here\n\n")?;
        assert!(doc.checklists.is_empty());
        Ok(())
    }

    #[test]
    fn parse_from_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(SAMPLE.as_bytes())?;

        let doc = parse_file(file.path())?;
        assert_eq!(doc.checklists.len(), 2);

        let missing = parse_file(std::path::Path::new("/nonexistent/audit.chk"));
        assert!(missing.is_err());
        Ok(())
    }
}
