use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_countries_table::Migration),
            Box::new(m20240101_000002_create_locations_table::Migration),
            Box::new(m20240101_000003_create_item_statuses_table::Migration),
            Box::new(m20240101_000004_create_users_table::Migration),
            Box::new(m20240101_000005_create_user_roles_table::Migration),
            Box::new(m20240101_000006_create_pharmacies_table::Migration),
            Box::new(m20240101_000007_create_items_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_countries_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_countries_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Countries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Countries::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Countries::Name)
                                .string_len(100)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_countries_name_unique")
                        .table(Countries::Table)
                        .col(Countries::Name)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Countries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Countries {
        Table,
        Id,
        Name,
    }
}

mod m20240101_000002_create_locations_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_countries_table::Countries;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Locations::Street)
                                .string_len(200)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Locations::City).string_len(100).not_null())
                        .col(ColumnDef::new(Locations::State).string_len(100).null())
                        .col(ColumnDef::new(Locations::CountryId).integer().not_null())
                        .col(ColumnDef::new(Locations::TimeZone).string_len(50).null())
                        .col(ColumnDef::new(Locations::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_locations_country")
                                .from(Locations::Table, Locations::CountryId)
                                .to(Countries::Table, Countries::Id)
                                // Country deletion is blocked while locations reference it
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Locations {
        Table,
        Id,
        Street,
        City,
        State,
        CountryId,
        TimeZone,
        CreatedAt,
    }
}

mod m20240101_000003_create_item_statuses_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_item_statuses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ItemStatuses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ItemStatuses::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ItemStatuses::Status)
                                .string_len(100)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ItemStatuses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum ItemStatuses {
        Table,
        Id,
        Status,
    }
}

mod m20240101_000004_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Users::FullName).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_users_email_unique")
                        .table(Users::Table)
                        .col(Users::Email)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Users {
        Table,
        Id,
        FullName,
        Email,
        PasswordHash,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_user_roles_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000004_create_users_table::Users;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_user_roles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(UserRoles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UserRoles::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(UserRoles::UserId).uuid().not_null())
                        .col(ColumnDef::new(UserRoles::RoleName).string().not_null())
                        .col(ColumnDef::new(UserRoles::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_user_roles_user")
                                .from(UserRoles::Table, UserRoles::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UserRoles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum UserRoles {
        Table,
        Id,
        UserId,
        RoleName,
        CreatedAt,
    }
}

mod m20240101_000006_create_pharmacies_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000002_create_locations_table::Locations;
    use super::m20240101_000004_create_users_table::Users;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_pharmacies_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Pharmacies::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Pharmacies::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Pharmacies::Name)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Pharmacies::Username)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Pharmacies::Password).string_len(100).null())
                        .col(ColumnDef::new(Pharmacies::Latitude).string().null())
                        .col(ColumnDef::new(Pharmacies::Longitude).string().null())
                        .col(
                            ColumnDef::new(Pharmacies::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Pharmacies::UserId).uuid().not_null())
                        .col(
                            ColumnDef::new(Pharmacies::AccountNumber)
                                .string_len(50)
                                .null(),
                        )
                        .col(ColumnDef::new(Pharmacies::LocationId).integer().null())
                        .col(
                            ColumnDef::new(Pharmacies::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Pharmacies::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_pharmacies_user")
                                .from(Pharmacies::Table, Pharmacies::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_pharmacies_location")
                                .from(Pharmacies::Table, Pharmacies::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Pharmacies::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Pharmacies {
        Table,
        Id,
        Name,
        Username,
        Password,
        Latitude,
        Longitude,
        IsActive,
        UserId,
        AccountNumber,
        LocationId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000007_create_items_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000003_create_item_statuses_table::ItemStatuses;
    use super::m20240101_000006_create_pharmacies_table::Pharmacies;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Items::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Items::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Items::Description).string_len(500).null())
                        .col(
                            ColumnDef::new(Items::Price)
                                .decimal_len(18, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Items::ItemStatusId).integer().not_null())
                        .col(ColumnDef::new(Items::Code).string_len(50).null())
                        .col(ColumnDef::new(Items::InsertedBy).string().null())
                        .col(ColumnDef::new(Items::InsertDate).timestamp().null())
                        .col(ColumnDef::new(Items::ExpiryDate).timestamp().null())
                        .col(ColumnDef::new(Items::UpdatedBy).string().null())
                        .col(ColumnDef::new(Items::UpdateDate).timestamp().null())
                        .col(
                            ColumnDef::new(Items::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Items::Stock).integer().null())
                        .col(ColumnDef::new(Items::PharmacyId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_item_status")
                                .from(Items::Table, Items::ItemStatusId)
                                .to(ItemStatuses::Table, ItemStatuses::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_pharmacy")
                                .from(Items::Table, Items::PharmacyId)
                                .to(Pharmacies::Table, Pharmacies::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Items {
        Table,
        Id,
        Name,
        Description,
        Price,
        ItemStatusId,
        Code,
        InsertedBy,
        InsertDate,
        ExpiryDate,
        UpdatedBy,
        UpdateDate,
        IsActive,
        Stock,
        PharmacyId,
    }
}
