//! Line-oriented extraction of the "NPC Outfitter Codes" wikitable.
//!
//! The export keeps each data row on a single line, e.g.
//!   `| Akananto (NPC) || https://tibia.fandom.com/Outfiter?o=130&c1=19 || {{Outfitter|outfit=130}}`
//! and separates rows with `|-`. Rows are read one line at a time; parsing the
//! table as a whole lets the `|-` separators bleed into neighbouring cells.

const ROW_MARKER: &str = "| ";
const CELL_SEPARATOR: &str = "||";
const TEMPLATE_OPEN: &str = "{{";

/// One data row: display name, outfiter link and template block, all trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutfitterRow<'a> {
    pub name: &'a str,
    pub link: &'a str,
    pub template: &'a str,
}

fn parse_row(line: &str) -> Option<OutfitterRow<'_>> {
    let row = line.trim().strip_prefix(ROW_MARKER)?;
    let mut cells = row.split(CELL_SEPARATOR).map(str::trim);
    let name = cells.next()?;
    let link = cells.next()?;
    let template = cells.next()?;
    if !template.starts_with(TEMPLATE_OPEN) {
        return None;
    }
    Some(OutfitterRow {
        name,
        link,
        template,
    })
}

/// Lazily yield every data row of `wikitext` in file order.
pub fn extract_rows(wikitext: &str) -> impl Iterator<Item = OutfitterRow<'_>> {
    wikitext.lines().filter_map(parse_row)
}
