use rust_xlsxwriter::Workbook;

/// Builds an in-memory xlsx workbook with one header row and numeric rows.
pub fn workbook_bytes(headers: &[&str], rows: &[Vec<f64>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (row, values) in rows.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            worksheet
                .write_number(row as u32 + 1, col as u16, *value)
                .unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// Writes a workbook into `dir` and returns its path.
pub fn write_workbook(
    dir: &std::path::Path,
    name: &str,
    headers: &[&str],
    rows: &[Vec<f64>],
) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, workbook_bytes(headers, rows)).unwrap();
    path
}
