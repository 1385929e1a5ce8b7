use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use constraints::{DependencyType, Project};

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format_workspaces(&self, project: &Project) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);

        let mut header = vec![
            Cell::new("Workspace").set_alignment(CellAlignment::Left),
            Cell::new("Ident").set_alignment(CellAlignment::Left),
            Cell::new("Version").set_alignment(CellAlignment::Left),
        ];
        header.extend(
            DependencyType::ALL
                .iter()
                .map(|ty| Cell::new(ty.as_str()).set_alignment(CellAlignment::Right)),
        );
        table.set_header(Row::from(header));

        for workspace in &project.workspaces {
            let mut row = vec![
                Cell::new(&workspace.relative_cwd),
                Cell::new(workspace.ident.to_string()),
                Cell::new(workspace.version().unwrap_or("-")),
            ];
            row.extend(DependencyType::ALL.iter().map(|ty| {
                Cell::new(workspace.manifest.dependencies_of(*ty).len())
                    .set_alignment(CellAlignment::Right)
            }));
            table.add_row(Row::from(row));
        }

        let count = project.workspaces.len();
        format!(
            "{}\n{} workspace{} found\n",
            table,
            count,
            if count == 1 { "" } else { "s" }
        )
    }
}
