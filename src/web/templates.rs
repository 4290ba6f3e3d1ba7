use tera::Tera;

const ADMIN_TEMPLATES: [(&str, &str); 4] = [
    ("admin/base.html", include_str!("../../templates/admin/base.html")),
    ("admin/user_list.html", include_str!("../../templates/admin/user_list.html")),
    ("admin/user_change.html", include_str!("../../templates/admin/user_change.html")),
    ("admin/user_add.html", include_str!("../../templates/admin/user_add.html")),
];

/// Builds the template set for the admin pages; templates are compiled into the binary.
pub fn admin_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(ADMIN_TEMPLATES)?;
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_templates_parse() {
        let tera = admin_templates().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        assert_eq!(names.len(), ADMIN_TEMPLATES.len());
    }

    #[test]
    fn user_values_are_escaped() {
        let tera = admin_templates().unwrap();
        let mut context = tera::Context::new();
        context.insert("current_user", "admin@npminit.com");
        context.insert("email", "<script>@x.com");
        context.insert("name", "");
        context.insert("errors", &serde_json::json!({}));
        let html = tera.render("admin/user_add.html", &context).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>@"));
    }
}
