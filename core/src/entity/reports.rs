use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub report_id: String,
    pub title: String,
    pub description: Option<String>,
    pub report_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "JsonBinary")]
    pub uploaded_files: Json,
    #[sea_orm(column_type = "Text", nullable)]
    pub extracted_text: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub hormone_data: Json,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub ai_analysis: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub charts: Option<Json>,
    /// uploaded, processing, analyzed or error
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub processing_errors: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,
    pub is_public: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
