use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create product table
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(string(Product::ProductId).primary_key())
                    .col(string(Product::ProductName))
                    .to_owned(),
            )
            .await?;

        // Create account table
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(string(Account::AccountId).primary_key())
                    .col(string(Account::State))
                    .col(boolean(Account::Enable).default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_account_state")
                    .table(Account::Table)
                    .col(Account::State)
                    .to_owned(),
            )
            .await?;

        // Create stbbind table (join table)
        manager
            .create_table(
                Table::create()
                    .table(Stbbind::Table)
                    .if_not_exists()
                    .col(string(Stbbind::AccountId))
                    .col(string(Stbbind::ProductId))
                    .col(integer(Stbbind::BindDay).default(356))
                    .col(boolean(Stbbind::IsActive).default(false))
                    .primary_key(
                        Index::create()
                            .name("pk_stbbind")
                            .col(Stbbind::AccountId)
                            .col(Stbbind::ProductId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stbbind_account")
                            .from(Stbbind::Table, Stbbind::AccountId)
                            .to(Account::Table, Account::AccountId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stbbind_product")
                            .from(Stbbind::Table, Stbbind::ProductId)
                            .to(Product::Table, Product::ProductId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create productcard table
        manager
            .create_table(
                Table::create()
                    .table(Productcard::Table)
                    .if_not_exists()
                    .col(string(Productcard::CardNumber).primary_key())
                    .col(string(Productcard::ProductId))
                    .col(string_null(Productcard::AccountId))
                    .col(integer(Productcard::CardDay))
                    .col(boolean(Productcard::IsUsed).default(false))
                    .col(date_time_null(Productcard::UsedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_productcard_product")
                            .from(Productcard::Table, Productcard::ProductId)
                            .to(Product::Table, Product::ProductId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_productcard_account")
                            .from(Productcard::Table, Productcard::AccountId)
                            .to(Account::Table, Account::AccountId)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Productcard::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stbbind::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Product::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    ProductId,
    ProductName,
}

#[derive(DeriveIden)]
enum Account {
    Table,
    AccountId,
    State,
    Enable,
}

#[derive(DeriveIden)]
enum Stbbind {
    Table,
    AccountId,
    ProductId,
    BindDay,
    IsActive,
}

#[derive(DeriveIden)]
enum Productcard {
    Table,
    CardNumber,
    ProductId,
    AccountId,
    CardDay,
    IsUsed,
    UsedAt,
}
