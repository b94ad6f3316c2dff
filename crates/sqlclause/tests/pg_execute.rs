use sqlclause::{
    ClauseBuilder, ClauseResult, Dialect, GenericClient, NullString, Record, execute_update,
    fetch_page,
};
use tokio_postgres::NoTls;

#[derive(Record)]
struct ItemFilter {
    #[tag(param = "name", db = "name")]
    name: NullString,
    #[tag(param = "qty__gte", db = "qty")]
    min_qty: i64,
    #[tag(param = "id__nin", db = "id")]
    excluded: Vec<i64>,
    #[tag(param = "sort_by", db = "sort")]
    sort_by: String,
    #[tag(param = "page", db = "page")]
    page: i64,
    #[tag(param = "limit", db = "limit")]
    limit: i64,
}

#[derive(Record)]
struct ItemUpdate {
    #[tag(param = "name", db = "name")]
    name: NullString,
    #[tag(param = "note", db = "note")]
    note: NullString,
}

#[derive(Record)]
struct ById {
    #[tag(param = "id", db = "id")]
    id: i64,
}

async fn connect() -> Option<tokio_postgres::Client> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping");
            return None;
        }
    };
    let (client, connection) = tokio_postgres::connect(&database_url, NoTls).await.ok()?;
    tokio::spawn(async move {
        let _ = connection.await;
    });
    Some(client)
}

#[tokio::test]
async fn filter_page_and_update_roundtrip() -> ClauseResult<()> {
    let Some(mut client) = connect().await else {
        return Ok(());
    };

    let tx = client.transaction().await?;
    tx.execute(
        "CREATE TEMP TABLE sqlclause_items (id BIGINT PRIMARY KEY, name TEXT, qty BIGINT NOT NULL, note TEXT)",
        &[],
    )
    .await?;
    for (id, name, qty) in [(1_i64, "bolt", 5_i64), (2, "nut", 50), (3, "washer", 20), (4, "nail", 80)] {
        GenericClient::execute(
            &tx,
            "INSERT INTO sqlclause_items (id, name, qty, note) VALUES ($1, $2, $3, 'n')",
            &[&id, &name, &qty],
        )
        .await?;
    }

    let builder = ClauseBuilder::default().with_dialect(Dialect::Postgres);
    let filter = ItemFilter {
        name: NullString::Absent,
        min_qty: 10,
        excluded: vec![4],
        sort_by: "-qty".into(),
        page: 1,
        limit: 1,
    };
    let clause = builder.build(&filter)?;
    let page = fetch_page(
        &tx,
        "SELECT id FROM sqlclause_items",
        "SELECT count(*) FROM sqlclause_items",
        &clause,
    )
    .await?;
    assert_eq!(page.total, 2);
    assert_eq!(page.rows.len(), 1);
    let top: i64 = page.rows[0].get(0);
    assert_eq!(top, 2);

    let update = ItemUpdate {
        name: NullString::new("hex nut".into()),
        note: NullString::null(),
    };
    let clause = builder.build_update(&update, &ById { id: 2 })?;
    let affected = execute_update(&tx, "UPDATE sqlclause_items", &clause).await?;
    assert_eq!(affected, 1);

    let row = GenericClient::query_one(
        &tx,
        "SELECT name, note FROM sqlclause_items WHERE id = $1",
        &[&2_i64],
    )
    .await?;
    let name: String = row.get(0);
    let note: Option<String> = row.get(1);
    assert_eq!(name, "hex nut");
    assert_eq!(note, None);

    tx.rollback().await?;
    Ok(())
}
