//! Web descriptors: per-model conventions (naming, permissions, URLs, breadcrumbs) and hooks.
//!
//! A descriptor is looked up once per request and drives the generic actions in
//! [`crate::service::CrudService`]. Every convention has a default that a descriptor may override.

mod breadcrumb;
mod config;
mod table;

pub use breadcrumb::{Breadcrumb, Button};
pub use config::ConfigDescriptor;
pub use table::{Column, Table};

use crate::case::{pluralize, to_verbose};
use crate::error::AppError;
use crate::model::{Action, Instance, User};
use crate::service::{BoundForm, FormSpec};
use crate::urls::Reverse;
use async_trait::async_trait;

#[async_trait]
pub trait Descriptor: Send + Sync {
    /// Globally unique identifier; also the `kind` of every instance this descriptor handles.
    fn web_id(&self) -> &str;

    /// Permission namespace.
    fn app_label(&self) -> &str;

    fn form(&self) -> &FormSpec;

    fn verbose_name(&self) -> String {
        to_verbose(self.web_id())
    }

    fn verbose_name_plural(&self) -> String {
        pluralize(&self.verbose_name())
    }

    fn perm_id(&self) -> &str {
        self.web_id()
    }

    fn url_prefix(&self) -> &str {
        self.web_id()
    }

    fn template_prefix(&self) -> &str {
        self.web_id()
    }

    /// Panics when `instance` belongs to another descriptor. Passing a foreign instance is a
    /// caller bug, not a request error.
    fn assert_instance_type(&self, instance: &Instance) {
        if instance.kind != self.web_id() {
            panic!("Expected type {} but got '{}'", self.web_id(), instance.kind);
        }
    }

    fn instance_label(&self, instance: &Instance) -> String {
        self.assert_instance_type(instance);
        instance.to_string()
    }

    fn new_instance(&self) -> Instance {
        Instance::new(self.web_id())
    }

    fn list_columns(&self) -> Vec<Column> {
        self.form()
            .fields
            .iter()
            .map(|f| Column {
                name: f.name.clone(),
                label: f.label.clone(),
            })
            .collect()
    }

    fn table(&self, rows: Vec<Instance>) -> Table {
        for row in &rows {
            self.assert_instance_type(row);
        }
        Table::new(self.list_columns(), rows)
    }

    // Permissions

    fn has_name_perms(&self, user: &User, name: &str) -> bool {
        user.is_authenticated() && user.has_perm(&format!("{}.{}_{}", self.app_label(), name, self.perm_id()))
    }

    fn has_list_perms(&self, _user: &User) -> bool {
        true
    }

    fn has_view_perms(&self, _user: &User) -> bool {
        true
    }

    fn has_add_perms(&self, user: &User) -> bool {
        self.has_name_perms(user, "add")
    }

    fn has_edit_perms(&self, user: &User) -> bool {
        self.has_name_perms(user, "edit")
    }

    fn has_delete_perms(&self, user: &User) -> bool {
        self.has_name_perms(user, "delete")
    }

    fn has_perms(&self, user: &User, action: Action) -> bool {
        match action {
            Action::List => self.has_list_perms(user),
            Action::View => self.has_view_perms(user),
            Action::Add => self.has_add_perms(user),
            Action::Edit => self.has_edit_perms(user),
            Action::Delete => self.has_delete_perms(user),
        }
    }

    /// Reason shown on the access-denied page.
    fn denied_message(&self, action: Action) -> String {
        match action {
            Action::List => format!("You cannot list {} objects", self.verbose_name()),
            other => format!("You cannot {} a {} object", other, self.verbose_name()),
        }
    }

    // Root

    fn breadcrumbs(&self, urls: &dyn Reverse) -> Result<Vec<Breadcrumb>, AppError> {
        Ok(vec![Breadcrumb::new(urls.reverse("root", &[])?, "Home")])
    }

    // List

    fn list_url(&self, urls: &dyn Reverse) -> Result<String, AppError> {
        urls.reverse(&format!("{}_list", self.url_prefix()), &[])
    }

    fn list_breadcrumbs(&self, urls: &dyn Reverse) -> Result<Vec<Breadcrumb>, AppError> {
        let mut crumbs = self.breadcrumbs(urls)?;
        crumbs.push(Breadcrumb::new(self.list_url(urls)?, self.verbose_name_plural()));
        Ok(crumbs)
    }

    fn list_buttons(&self, urls: &dyn Reverse, user: &User) -> Result<Vec<Button>, AppError> {
        let mut buttons = Vec::new();
        if self.has_add_perms(user) {
            buttons.push(Button::new(
                "addlink",
                format!("Add {}", self.verbose_name()),
                self.add_url(urls)?,
            ));
        }
        Ok(buttons)
    }

    // View

    fn view_url(&self, urls: &dyn Reverse, instance: &Instance) -> Result<String, AppError> {
        self.assert_instance_type(instance);
        urls.reverse(&format!("{}_detail", self.url_prefix()), &[pk_arg(instance)?.as_str()])
    }

    fn view_breadcrumbs(&self, urls: &dyn Reverse, instance: &Instance) -> Result<Vec<Breadcrumb>, AppError> {
        self.assert_instance_type(instance);
        let mut crumbs = self.list_breadcrumbs(urls)?;
        crumbs.push(Breadcrumb::new(self.view_url(urls, instance)?, self.instance_label(instance)));
        Ok(crumbs)
    }

    fn view_buttons(&self, urls: &dyn Reverse, user: &User, instance: &Instance) -> Result<Vec<Button>, AppError> {
        self.assert_instance_type(instance);
        let mut buttons = Vec::new();
        if self.has_edit_perms(user) {
            buttons.push(Button::new("changelink", "Edit", self.edit_url(urls, instance)?));
        }
        if self.has_delete_perms(user) {
            buttons.push(Button::new("deletelink", "Delete", self.delete_url(urls, instance)?));
        }
        Ok(buttons)
    }

    // Add

    fn add_url(&self, urls: &dyn Reverse) -> Result<String, AppError> {
        urls.reverse(&format!("{}_add", self.url_prefix()), &[])
    }

    fn add_breadcrumbs(&self, urls: &dyn Reverse) -> Result<Vec<Breadcrumb>, AppError> {
        let mut crumbs = self.list_breadcrumbs(urls)?;
        crumbs.push(Breadcrumb::new(self.add_url(urls)?, "add"));
        Ok(crumbs)
    }

    // Edit

    fn edit_url(&self, urls: &dyn Reverse, instance: &Instance) -> Result<String, AppError> {
        self.assert_instance_type(instance);
        urls.reverse(&format!("{}_edit", self.url_prefix()), &[pk_arg(instance)?.as_str()])
    }

    /// Where to go after a successful add or edit.
    fn edit_finished_url(&self, urls: &dyn Reverse, instance: &Instance) -> Result<String, AppError> {
        self.assert_instance_type(instance);
        self.view_url(urls, instance)
    }

    fn edit_breadcrumbs(&self, urls: &dyn Reverse, instance: &Instance) -> Result<Vec<Breadcrumb>, AppError> {
        self.assert_instance_type(instance);
        let mut crumbs = self.view_breadcrumbs(urls, instance)?;
        crumbs.push(Breadcrumb::new(self.edit_url(urls, instance)?, "edit"));
        Ok(crumbs)
    }

    // Delete

    fn delete_url(&self, urls: &dyn Reverse, instance: &Instance) -> Result<String, AppError> {
        self.assert_instance_type(instance);
        urls.reverse(&format!("{}_delete", self.url_prefix()), &[pk_arg(instance)?.as_str()])
    }

    fn delete_finished_url(&self, urls: &dyn Reverse, instance: &Instance) -> Result<String, AppError> {
        self.assert_instance_type(instance);
        self.list_url(urls)
    }

    fn delete_breadcrumbs(&self, urls: &dyn Reverse, instance: &Instance) -> Result<Vec<Breadcrumb>, AppError> {
        self.assert_instance_type(instance);
        let mut crumbs = self.view_breadcrumbs(urls, instance)?;
        crumbs.push(Breadcrumb::new(self.delete_url(urls, instance)?, "delete"));
        Ok(crumbs)
    }

    // Hooks

    /// Runs after a valid form builds `instance` and before it is saved. Returning false
    /// skips the save and re-renders the form.
    async fn pre_save(&self, instance: &mut Instance, _form: &BoundForm) -> bool {
        self.assert_instance_type(instance);
        true
    }

    /// Reasons that block deleting `instance`; empty means the delete may proceed.
    async fn check_delete(&self, instance: &Instance) -> Result<Vec<String>, AppError> {
        self.assert_instance_type(instance);
        Ok(Vec::new())
    }
}

fn pk_arg(instance: &Instance) -> Result<String, AppError> {
    instance
        .pk_string()
        .ok_or_else(|| AppError::NoReverseMatch(format!("unsaved {} has no primary key", instance.kind)))
}
