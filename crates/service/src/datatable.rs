//! Server-side datatable assembly.
//!
//! Entities describe their table as typed columns and row actions; this module
//! turns a page of rows into heading labels and HTML cells.

use serde::Serialize;

use common::pagination::Pagination;

use crate::auth::EntityType;
use crate::view::html::escape;
use crate::view::ViewContext;

/// One table column.
pub trait DatatableColumn<R> {
    /// Translation key of the heading; also the column's data key.
    fn key(&self) -> &'static str;
    fn render(&self, row: &R, ctx: &ViewContext) -> String;
}

/// One entry of a row's action menu.
pub trait DatatableAction<R> {
    /// Translation key of the menu label.
    fn label_key(&self) -> &'static str;
    fn url(&self, row: &R, ctx: &ViewContext) -> String;
    fn visible(&self, row: &R) -> bool;
}

/// State every datatable row exposes for the checkbox and generic entity actions.
pub trait DatatableRow {
    fn public_id(&self) -> i64;
    fn can_edit(&self) -> bool;
    /// Soft-deleted (archived) rows get a restore action instead of archive.
    fn is_archived(&self) -> bool;
    fn is_deleted(&self) -> bool;
}

/// Rendered table page returned to the client-side grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatatableResponse {
    pub entity: String,
    pub headings: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

/// A page of rows plus the unpaginated total.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub rows: Vec<R>,
    pub total: u64,
}

pub struct DatatableService<'a> {
    ctx: &'a ViewContext,
}

impl<'a> DatatableService<'a> {
    pub fn new(ctx: &'a ViewContext) -> Self { Self { ctx } }

    /// Render `page` with `columns`. An empty `actions` slice omits the action menu column.
    pub fn create_datatable<R, C, A>(
        &self,
        entity: EntityType,
        page: &Page<R>,
        pagination: Pagination,
        columns: &[C],
        actions: &[A],
        show_checkbox: bool,
    ) -> DatatableResponse
    where
        R: DatatableRow,
        C: DatatableColumn<R>,
        A: DatatableAction<R>,
    {
        let mut headings = Vec::with_capacity(columns.len() + 2);
        if show_checkbox {
            headings.push(String::new());
        }
        headings.extend(columns.iter().map(|c| self.ctx.trans(c.key())));
        if !actions.is_empty() {
            headings.push(self.ctx.trans("action"));
        }

        let rows = page
            .rows
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(headings.len());
                if show_checkbox {
                    cells.push(checkbox(row.public_id()));
                }
                cells.extend(columns.iter().map(|c| c.render(row, self.ctx)));
                if !actions.is_empty() {
                    cells.push(self.action_menu(entity, row, actions));
                }
                cells
            })
            .collect();

        let pagination = pagination.clamped();
        DatatableResponse {
            entity: entity.as_str().to_string(),
            headings,
            rows,
            total: page.total,
            page: pagination.page,
            per_page: pagination.per_page,
        }
    }

    fn action_menu<R: DatatableRow, A: DatatableAction<R>>(&self, entity: EntityType, row: &R, actions: &[A]) -> String {
        let mut items = String::new();
        let mut has_action = false;
        for action in actions.iter().filter(|a| a.visible(row)) {
            items.push_str(&menu_item(&action.url(row, self.ctx), &self.ctx.trans(action.label_key())));
            has_action = true;
        }

        if row.can_edit() {
            let id = row.public_id();
            if has_action {
                items.push_str("<li class=\"divider\"></li>");
            }
            if !row.is_archived() {
                let label = self.ctx.trans(&format!("archive_{entity}"));
                items.push_str(&menu_item(&format!("javascript:archiveEntity({id})"), &label));
            } else {
                let label = self.ctx.trans(&format!("restore_{entity}"));
                items.push_str(&menu_item(&format!("javascript:restoreEntity({id})"), &label));
            }
            if !row.is_deleted() {
                let label = self.ctx.trans(&format!("delete_{entity}"));
                items.push_str(&menu_item(&format!("javascript:deleteEntity({id})"), &label));
            }
        }

        if items.is_empty() {
            return String::new();
        }

        format!(
            "<div class=\"btn-group tr-action\">\
             <button type=\"button\" class=\"btn btn-xs btn-default dropdown-toggle\" data-toggle=\"dropdown\">{} <span class=\"caret\"></span></button>\
             <ul class=\"dropdown-menu\" role=\"menu\">{items}</ul></div>",
            escape(&self.ctx.trans("select")),
        )
    }
}

fn checkbox(public_id: i64) -> String {
    format!("<input type=\"checkbox\" name=\"ids[]\" value=\"{public_id}\">")
}

fn menu_item(url: &str, label: &str) -> String {
    format!("<li><a href=\"{}\">{}</a></li>", escape(url), escape(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: i64,
        editable: bool,
        archived: bool,
        deleted: bool,
    }

    impl DatatableRow for Row {
        fn public_id(&self) -> i64 { self.id }
        fn can_edit(&self) -> bool { self.editable }
        fn is_archived(&self) -> bool { self.archived }
        fn is_deleted(&self) -> bool { self.deleted }
    }

    struct IdColumn;

    impl DatatableColumn<Row> for IdColumn {
        fn key(&self) -> &'static str { "amount" }
        fn render(&self, row: &Row, _ctx: &ViewContext) -> String { row.id.to_string() }
    }

    struct OpenAction;

    impl DatatableAction<Row> for OpenAction {
        fn label_key(&self) -> &'static str { "edit_expense" }
        fn url(&self, row: &Row, ctx: &ViewContext) -> String { ctx.urls.to(&format!("expenses/{}/edit", row.id)) }
        fn visible(&self, row: &Row) -> bool { row.editable }
    }

    fn ctx() -> ViewContext { ViewContext::with_defaults("", "%Y-%m-%d") }

    fn page(rows: Vec<Row>) -> Page<Row> {
        let total = rows.len() as u64;
        Page { rows, total }
    }

    #[test]
    fn checkbox_columns_and_menu() {
        let ctx = ctx();
        let table = DatatableService::new(&ctx).create_datatable(
            EntityType::Expense,
            &page(vec![Row { id: 7, editable: true, archived: false, deleted: false }]),
            Pagination::default(),
            &[IdColumn],
            &[OpenAction],
            true,
        );
        assert_eq!(table.entity, "expense");
        assert_eq!(table.headings, vec!["", "Amount", "Action"]);
        let cells = &table.rows[0];
        assert_eq!(cells[0], "<input type=\"checkbox\" name=\"ids[]\" value=\"7\">");
        assert_eq!(cells[1], "7");
        assert!(cells[2].contains("<li><a href=\"/expenses/7/edit\">Edit Expense</a></li><li class=\"divider\"></li>"));
        assert!(cells[2].contains("javascript:archiveEntity(7)"));
        assert!(cells[2].contains("javascript:deleteEntity(7)"));
        assert!(!cells[2].contains("restoreEntity"));
    }

    #[test]
    fn archived_rows_offer_restore() {
        let ctx = ctx();
        let table = DatatableService::new(&ctx).create_datatable(
            EntityType::Expense,
            &page(vec![Row { id: 3, editable: true, archived: true, deleted: true }]),
            Pagination::default(),
            &[IdColumn],
            &[OpenAction],
            false,
        );
        let menu = &table.rows[0][1];
        assert!(menu.contains("javascript:restoreEntity(3)"));
        assert!(!menu.contains("archiveEntity"));
        assert!(!menu.contains("deleteEntity"));
    }

    #[test]
    fn restore_is_separated_from_row_actions() {
        let ctx = ctx();
        let table = DatatableService::new(&ctx).create_datatable(
            EntityType::Expense,
            &page(vec![Row { id: 3, editable: true, archived: true, deleted: false }]),
            Pagination::default(),
            &[IdColumn],
            &[OpenAction],
            false,
        );
        let menu = &table.rows[0][1];
        assert!(menu.contains("Edit Expense</a></li><li class=\"divider\"></li><li><a href=\"javascript:restoreEntity(3)\""));
        assert_eq!(menu.matches("divider").count(), 1);
        assert!(menu.contains("javascript:deleteEntity(3)"));
    }

    #[test]
    fn read_only_rows_get_empty_menu() {
        let ctx = ctx();
        let table = DatatableService::new(&ctx).create_datatable(
            EntityType::Expense,
            &page(vec![Row { id: 3, editable: false, archived: false, deleted: false }]),
            Pagination::default(),
            &[IdColumn],
            &[OpenAction],
            false,
        );
        assert_eq!(table.rows[0][1], "");
    }

    #[test]
    fn no_actions_means_no_menu_column() {
        let ctx = ctx();
        let table = DatatableService::new(&ctx).create_datatable::<Row, IdColumn, OpenAction>(
            EntityType::Expense,
            &page(vec![Row { id: 1, editable: true, archived: false, deleted: false }]),
            Pagination { page: 0, per_page: 500 },
            &[IdColumn],
            &[],
            false,
        );
        assert_eq!(table.headings, vec!["Amount"]);
        assert_eq!(table.rows[0].len(), 1);
        assert_eq!((table.page, table.per_page), (1, 100));
    }
}
