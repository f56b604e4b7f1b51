// `SchemaManager` carries a lifetime parameter, but the `MigrationTrait`
// methods are declared with it elided; writing `<'_>` here makes the
// async-trait-desugared lifetime early-bound and conflicts with the trait
// signature (E0195). Allow the crate-wide `rust_2018_idioms` elision lint for
// this module so the generated migration signatures match the trait.
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_customers_table::Migration),
            Box::new(m20250101_000002_create_products_table::Migration),
            Box::new(m20250101_000003_create_orders_table::Migration),
            Box::new(m20250101_000004_create_order_transitions_table::Migration),
            Box::new(m20250101_000005_create_department_messages_table::Migration),
        ]
    }
}

mod m20250101_000001_create_customers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_customers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Customers::Name).string().not_null())
                        .col(ColumnDef::new(Customers::Email).string().not_null())
                        .col(ColumnDef::new(Customers::Phone).string().null())
                        .col(ColumnDef::new(Customers::Address).string().null())
                        .col(ColumnDef::new(Customers::Status).string().not_null())
                        .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Customers::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_email")
                        .table(Customers::Table)
                        .col(Customers::Email)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Customers {
        Table,
        Id,
        Name,
        Email,
        Phone,
        Address,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000002_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Products::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Status).string().not_null())
                        .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        Code,
        Name,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000003_create_orders_table {
    use sea_orm_migration::prelude::*;

    use super::m20250101_000001_create_customers_table::Customers;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::CustomerId).uuid().not_null())
                        .col(
                            ColumnDef::new(Orders::ProductDescription)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::Quantity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(Orders::Material).string().null())
                        .col(ColumnDef::new(Orders::Department).string().not_null())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(
                            ColumnDef::new(Orders::IsArchived)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp().null())
                        .col(
                            ColumnDef::new(Orders::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_customer_id")
                                .from(Orders::Table, Orders::CustomerId)
                                .to(Customers::Table, Customers::Id)
                                .on_update(ForeignKeyAction::Cascade)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_customer_id")
                        .table(Orders::Table)
                        .col(Orders::CustomerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        OrderCode,
        CustomerId,
        ProductDescription,
        Quantity,
        Material,
        Department,
        Status,
        IsArchived,
        CreatedAt,
        UpdatedAt,
        Version,
    }
}

mod m20250101_000004_create_order_transitions_table {
    use sea_orm_migration::prelude::*;

    use super::m20250101_000003_create_orders_table::Orders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_order_transitions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderTransitions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderTransitions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderTransitions::OrderId).uuid().not_null())
                        .col(
                            ColumnDef::new(OrderTransitions::Position)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderTransitions::Actor).string().not_null())
                        .col(
                            ColumnDef::new(OrderTransitions::FromStatus)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderTransitions::ToStatus)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderTransitions::Notes).string().null())
                        .col(
                            ColumnDef::new(OrderTransitions::AttachmentRef)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(OrderTransitions::RecordedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_transitions_order_id")
                                .from(OrderTransitions::Table, OrderTransitions::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_update(ForeignKeyAction::Cascade)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Insertion order per ledger is fixed by (order_id, position)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_transitions_order_position")
                        .table(OrderTransitions::Table)
                        .col(OrderTransitions::OrderId)
                        .col(OrderTransitions::Position)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderTransitions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum OrderTransitions {
        Table,
        Id,
        OrderId,
        Position,
        Actor,
        FromStatus,
        ToStatus,
        Notes,
        AttachmentRef,
        RecordedAt,
    }
}

mod m20250101_000005_create_department_messages_table {
    use sea_orm_migration::prelude::*;

    use super::m20250101_000003_create_orders_table::Orders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_department_messages_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DepartmentMessages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DepartmentMessages::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DepartmentMessages::FromDepartment)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DepartmentMessages::ToDepartment)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DepartmentMessages::OrderId).uuid().null())
                        .col(
                            ColumnDef::new(DepartmentMessages::Priority)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DepartmentMessages::Body).text().not_null())
                        .col(
                            ColumnDef::new(DepartmentMessages::IsRead)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(DepartmentMessages::SentAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_department_messages_order_id")
                                .from(DepartmentMessages::Table, DepartmentMessages::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_update(ForeignKeyAction::Cascade)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_department_messages_to_department")
                        .table(DepartmentMessages::Table)
                        .col(DepartmentMessages::ToDepartment)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DepartmentMessages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DepartmentMessages {
        Table,
        Id,
        FromDepartment,
        ToDepartment,
        OrderId,
        Priority,
        Body,
        IsRead,
        SentAt,
    }
}
