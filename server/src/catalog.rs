//! The admin views served by this server.

use backoffice_engine::{
    CollectionSchema, ColumnDef, FieldDef, FieldType, FilterDef, FilterOption, ViewConfig,
};

/// Every view, looked up by name.
#[derive(Debug, Clone)]
pub struct Catalog {
    views: Vec<ViewConfig>,
}

impl Catalog {
    pub fn new(views: Vec<ViewConfig>) -> Self {
        Self { views }
    }

    /// The back-office views, each starting at `page_size` rows per page.
    pub fn builtin(page_size: usize) -> Self {
        let views = vec![
            buyers(),
            suppliers(),
            demands(),
            offers(),
            kyc(),
            designations(),
            blogs(),
            sliders(),
            price_lists(),
            auto_messages(),
            employees(),
            tasks(),
        ];
        Self::new(views.into_iter().map(|v| v.page_size(page_size)).collect())
    }

    pub fn get(&self, name: &str) -> Option<&ViewConfig> {
        self.views.iter().find(|v| v.name == name)
    }

    pub fn views(&self) -> &[ViewConfig] {
        &self.views
    }
}

fn options(values: &[(&str, &str)]) -> Vec<FilterOption> {
    values
        .iter()
        .map(|(value, label)| FilterOption::new(*value, *label))
        .collect()
}

fn active_filter() -> FilterDef {
    FilterDef::new(
        "status",
        "Status",
        options(&[("active", "Active"), ("inactive", "Inactive")]),
    )
}

fn review_filter() -> FilterDef {
    FilterDef::new(
        "status",
        "Status",
        options(&[
            ("pending", "Pending"),
            ("approved", "Approved"),
            ("rejected", "Rejected"),
        ]),
    )
}

fn buyers() -> ViewConfig {
    ViewConfig::new("buyers", "/buyers")
        .item_label("Buyer")
        .searchable(["company", "contactName", "email", "city"])
        .column(ColumnDef::new("company", "Company", FieldType::String))
        .column(ColumnDef::new("contactName", "Contact", FieldType::String))
        .column(ColumnDef::new("email", "Email", FieldType::String))
        .column(ColumnDef::new("city", "City", FieldType::String))
        .column(ColumnDef::new("createdAt", "Joined", FieldType::Timestamp))
        .filter(active_filter())
        .status_field("status")
        .form(CollectionSchema::new(
            "buyers",
            vec![
                FieldDef::required("company", FieldType::String),
                FieldDef::required("contactName", FieldType::String),
                FieldDef::required("email", FieldType::String),
                FieldDef::optional("city", FieldType::String),
                FieldDef::optional("status", FieldType::String),
            ],
        ))
}

fn suppliers() -> ViewConfig {
    ViewConfig::new("suppliers", "/suppliers")
        .item_label("Supplier")
        .searchable(["company", "contactName", "category"])
        .column(ColumnDef::new("company", "Company", FieldType::String))
        .column(ColumnDef::new("contactName", "Contact", FieldType::String))
        .column(ColumnDef::new("category", "Category", FieldType::String))
        .column(ColumnDef::new("rating", "Rating", FieldType::Float))
        .filter(active_filter())
        .status_field("status")
        .form(CollectionSchema::new(
            "suppliers",
            vec![
                FieldDef::required("company", FieldType::String),
                FieldDef::required("contactName", FieldType::String),
                FieldDef::optional("category", FieldType::String),
                FieldDef::optional("rating", FieldType::Float),
                FieldDef::optional("status", FieldType::String),
            ],
        ))
}

fn demands() -> ViewConfig {
    ViewConfig::new("demands", "/demands")
        .item_label("Demand")
        .searchable(["product", "buyer", "category"])
        .column(ColumnDef::new("product", "Product", FieldType::String))
        .column(ColumnDef::new("buyer", "Buyer", FieldType::String))
        .column(ColumnDef::new("category", "Category", FieldType::String))
        .column(ColumnDef::new("quantity", "Quantity", FieldType::Int))
        .column(ColumnDef::new("postedAt", "Posted At", FieldType::Timestamp))
        .column(ColumnDef::new("status", "Status", FieldType::String))
        .filter(review_filter())
        .filter(FilterDef::new(
            "category",
            "Category",
            options(&[
                ("machinery", "Machinery"),
                ("metals", "Metals"),
                ("polymers", "Polymers"),
                ("agro", "Agro"),
            ]),
        ))
        .status_field("status")
        .form(CollectionSchema::new(
            "demands",
            vec![
                FieldDef::required("product", FieldType::String),
                FieldDef::required("buyer", FieldType::String),
                FieldDef::required("quantity", FieldType::Int),
                FieldDef::optional("category", FieldType::String),
                FieldDef::optional("postedAt", FieldType::Timestamp),
                FieldDef::optional("status", FieldType::String),
            ],
        ))
}

fn offers() -> ViewConfig {
    ViewConfig::new("offers", "/offers")
        .item_label("Offer")
        .searchable(["product", "supplier"])
        .column(ColumnDef::new("product", "Product", FieldType::String))
        .column(ColumnDef::new("supplier", "Supplier", FieldType::String))
        .column(ColumnDef::new("price", "Price", FieldType::Float))
        .column(ColumnDef::new("validUntil", "Valid Until", FieldType::Timestamp))
        .column(ColumnDef::new("status", "Status", FieldType::String))
        .filter(review_filter())
        .status_field("status")
        .form(CollectionSchema::new(
            "offers",
            vec![
                FieldDef::required("product", FieldType::String),
                FieldDef::required("supplier", FieldType::String),
                FieldDef::required("price", FieldType::Float),
                FieldDef::optional("validUntil", FieldType::Timestamp),
                FieldDef::optional("status", FieldType::String),
            ],
        ))
}

fn kyc() -> ViewConfig {
    ViewConfig::new("kyc", "/kyc")
        .item_label("KYC request")
        .searchable(["company", "documentType", "gstin"])
        .column(ColumnDef::new("company", "Company", FieldType::String))
        .column(ColumnDef::new("documentType", "Document", FieldType::String))
        .column(ColumnDef::new("gstin", "GSTIN", FieldType::String))
        .column(ColumnDef::new("submittedAt", "Submitted At", FieldType::Timestamp))
        .column(ColumnDef::new("status", "Status", FieldType::String))
        .filter(review_filter())
        .status_field("status")
}

fn designations() -> ViewConfig {
    ViewConfig::new("designations", "/designations")
        .item_label("Designation")
        .searchable(["name", "department"])
        .column(ColumnDef::new("name", "Name", FieldType::String))
        .column(ColumnDef::new("department", "Department", FieldType::String))
        .column(ColumnDef::new("createdAt", "Created", FieldType::Timestamp))
        .form(CollectionSchema::new(
            "designations",
            vec![
                FieldDef::required("name", FieldType::String),
                FieldDef::optional("department", FieldType::String),
            ],
        ))
}

fn blogs() -> ViewConfig {
    ViewConfig::new("blogs", "/blogs")
        .item_label("Blog")
        .searchable(["title", "author", "tags"])
        .column(ColumnDef::new("title", "Title", FieldType::String))
        .column(ColumnDef::new("author", "Author", FieldType::String))
        .column(ColumnDef::new("tags", "Tags", FieldType::Json))
        .column(ColumnDef::new("publishedAt", "Published At", FieldType::Timestamp))
        .filter(FilterDef::new(
            "status",
            "Status",
            options(&[("draft", "Draft"), ("published", "Published")]),
        ))
        .status_field("status")
        .form(CollectionSchema::new(
            "blogs",
            vec![
                FieldDef::required("title", FieldType::String),
                FieldDef::optional("author", FieldType::String),
                FieldDef::optional("body", FieldType::String),
                FieldDef::optional("tags", FieldType::Json),
                FieldDef::optional("coverImage", FieldType::String),
                FieldDef::optional("publishedAt", FieldType::Timestamp),
                FieldDef::optional("status", FieldType::String),
            ],
        ))
}

fn sliders() -> ViewConfig {
    ViewConfig::new("sliders", "/sliders")
        .item_label("Slider")
        .searchable(["title"])
        .column(ColumnDef::new("title", "Title", FieldType::String))
        .column(ColumnDef::new("order", "Order", FieldType::Int))
        .column(ColumnDef::new("imageUrl", "Image", FieldType::String))
        .filter(active_filter())
        .status_field("status")
        .form(CollectionSchema::new(
            "sliders",
            vec![
                FieldDef::required("title", FieldType::String),
                FieldDef::required("imageUrl", FieldType::String),
                FieldDef::optional("order", FieldType::Int),
                FieldDef::optional("status", FieldType::String),
            ],
        ))
}

fn price_lists() -> ViewConfig {
    ViewConfig::new("price-lists", "/price-list")
        .item_label("Price list")
        .searchable(["product", "category"])
        .column(ColumnDef::new("product", "Product", FieldType::String))
        .column(ColumnDef::new("category", "Category", FieldType::String))
        .column(ColumnDef::new("price", "Price", FieldType::Float))
        .column(ColumnDef::new("unit", "Unit", FieldType::String))
        .column(ColumnDef::new("updatedAt", "Updated", FieldType::Timestamp))
        .form(CollectionSchema::new(
            "price-lists",
            vec![
                FieldDef::required("product", FieldType::String),
                FieldDef::required("price", FieldType::Float),
                FieldDef::optional("category", FieldType::String),
                FieldDef::optional("unit", FieldType::String),
            ],
        ))
}

fn auto_messages() -> ViewConfig {
    ViewConfig::new("auto-messages", "/auto-messages")
        .item_label("Auto message")
        .searchable(["name", "trigger", "template"])
        .column(ColumnDef::new("name", "Name", FieldType::String))
        .column(ColumnDef::new("trigger", "Trigger", FieldType::String))
        .column(ColumnDef::new("channel", "Channel", FieldType::String))
        .filter(FilterDef::new(
            "channel",
            "Channel",
            options(&[("email", "Email"), ("sms", "SMS"), ("whatsapp", "WhatsApp")]),
        ))
        .filter(active_filter())
        .status_field("status")
        .form(CollectionSchema::new(
            "auto-messages",
            vec![
                FieldDef::required("name", FieldType::String),
                FieldDef::required("trigger", FieldType::String),
                FieldDef::required("template", FieldType::String),
                FieldDef::optional("channel", FieldType::String),
                FieldDef::optional("status", FieldType::String),
            ],
        ))
}

fn employees() -> ViewConfig {
    ViewConfig::new("employees", "/employees")
        .item_label("Employee")
        .searchable(["name", "email", "designation"])
        .column(ColumnDef::new("name", "Name", FieldType::String))
        .column(ColumnDef::new("email", "Email", FieldType::String))
        .column(ColumnDef::new("designation", "Designation", FieldType::String))
        .column(ColumnDef::new("joinedAt", "Joined", FieldType::Timestamp))
        .filter(active_filter())
        .status_field("status")
        .form(CollectionSchema::new(
            "employees",
            vec![
                FieldDef::required("name", FieldType::String),
                FieldDef::required("email", FieldType::String),
                FieldDef::optional("designation", FieldType::String),
                FieldDef::optional("joinedAt", FieldType::Timestamp),
                FieldDef::optional("status", FieldType::String),
            ],
        ))
        .export(["name", "email", "designation"])
}

fn tasks() -> ViewConfig {
    ViewConfig::new("tasks", "/tasks")
        .item_label("Task")
        .searchable(["title", "assignee"])
        .column(ColumnDef::new("title", "Title", FieldType::String))
        .column(ColumnDef::new("assignee", "Assignee", FieldType::String))
        .column(ColumnDef::new("dueDate", "Due", FieldType::Timestamp))
        .column(ColumnDef::new("priority", "Priority", FieldType::Int))
        .filter(FilterDef::new(
            "status",
            "Status",
            options(&[("todo", "To do"), ("in-progress", "In progress"), ("done", "Done")]),
        ))
        .status_field("status")
        .form(CollectionSchema::new(
            "tasks",
            vec![
                FieldDef::required("title", FieldType::String),
                FieldDef::optional("assignee", FieldType::String),
                FieldDef::optional("dueDate", FieldType::Timestamp),
                FieldDef::optional("priority", FieldType::Int),
                FieldDef::optional("status", FieldType::String),
            ],
        ))
}
