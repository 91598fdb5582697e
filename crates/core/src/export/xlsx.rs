use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use super::table::{Cell, Sheet};

/// Serialize `sheets` into an xlsx workbook, one worksheet each, with bold
/// headers.
pub fn workbook_bytes(sheets: &[Sheet]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet.name.as_str())
            .with_context(|| format!("invalid sheet name '{}'", sheet.name))?;
        for (row_index, row) in sheet.rows.iter().enumerate() {
            let row_number = u32::try_from(row_index).context("too many rows")?;
            for (column_index, cell) in row.iter().enumerate() {
                let column = u16::try_from(column_index).context("too many columns")?;
                let bold = sheet.is_header(row_index, column_index);
                match cell {
                    Cell::Text(value) if bold => {
                        worksheet.write_string_with_format(row_number, column, value, &header)?;
                    }
                    Cell::Text(value) => {
                        worksheet.write_string(row_number, column, value)?;
                    }
                    Cell::Count(value) => {
                        worksheet.write_number(row_number, column, *value as f64)?;
                    }
                }
            }
        }
        worksheet.autofit();
    }

    workbook
        .save_to_buffer()
        .context("failed to serialize workbook")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        export::table::{workbook_sheets, TeamSheetLayout},
        state::TrackerState,
    };

    #[test]
    fn produces_zip_container() -> Result<()> {
        let sheets = workbook_sheets(&TrackerState::default(), TeamSheetLayout::Preview);
        let bytes = workbook_bytes(&sheets)?;
        assert!(bytes.starts_with(b"PK"));
        Ok(())
    }

    #[test]
    fn rejects_invalid_sheet_names() {
        let sheet = Sheet {
            name: "bad/name".to_string(),
            rows: Vec::new(),
            header_rows: 0,
            header_columns: 0,
        };
        assert!(workbook_bytes(&[sheet]).is_err());
    }
}
