use sqlx::PgPool;

use crate::{
    app::{errors::DefaultApiError, models::api_error::ApiError},
    auth::jwt::models::claims::Claims,
    memes::models::generated_asset::GeneratedAsset,
};

use super::{
    errors::MemeSoldiersApiError,
    models::{meme_soldier::MemeSoldier, mint_response::MintResponse},
};

const NUM_INSERTED_COLUMNS: usize = 13;

pub async fn create_meme_soldiers(
    assets: &[GeneratedAsset],
    claims: &Claims,
    pool: &PgPool,
) -> Result<Vec<MemeSoldier>, ApiError> {
    let soldiers: Vec<MemeSoldier> = assets
        .iter()
        .map(|asset| MemeSoldier::from_asset(asset, claims))
        .collect();

    if soldiers.is_empty() {
        return Ok(soldiers);
    }

    let sql = insert_sql(soldiers.len());
    let mut sqlx = sqlx::query(&sql);

    for s in &soldiers {
        sqlx = sqlx.bind(&s.id);
        sqlx = sqlx.bind(&s.owner_id);
        sqlx = sqlx.bind(&s.name);
        sqlx = sqlx.bind(&s.prompt);
        sqlx = sqlx.bind(&s.image_url);
        sqlx = sqlx.bind(&s.coin_icon_url);
        sqlx = sqlx.bind(&s.token_id);
        sqlx = sqlx.bind(&s.contract_address);
        sqlx = sqlx.bind(s.deployed_to_battlefield);
        sqlx = sqlx.bind(s.token_amount);
        sqlx = sqlx.bind(s.token_amount_deployed);
        sqlx = sqlx.bind(s.updated_at as i64);
        sqlx = sqlx.bind(s.created_at as i64);
    }

    match sqlx.execute(pool).await {
        Ok(_) => Ok(soldiers),
        Err(e) => {
            tracing::error!(%e);
            Err(DefaultApiError::InternalServerError.value())
        }
    }
}

fn insert_sql(rows: usize) -> String {
    let mut sql = "
    INSERT INTO meme_soldiers (
        id, owner_id, name, prompt, image_url, coin_icon_url, token_id,
        contract_address, deployed_to_battlefield, token_amount,
        token_amount_deployed, updated_at, created_at
    ) VALUES "
        .to_string();

    let mut index = 1;
    for i in 0..rows {
        if i != 0 {
            sql.push_str(", ");
        }

        sql.push('(');
        for j in 0..NUM_INSERTED_COLUMNS {
            sql.push_str(&["$", &index.to_string()].concat());
            index += 1;

            if j != NUM_INSERTED_COLUMNS - 1 {
                sql.push_str(", ");
            }
        }
        sql.push(')');
    }

    sql
}

pub async fn get_meme_soldiers(claims: &Claims, pool: &PgPool) -> Result<Vec<MemeSoldier>, ApiError> {
    let sqlx_result = sqlx::query_as::<_, MemeSoldier>(
        "
        SELECT * FROM meme_soldiers WHERE owner_id = $1 ORDER BY created_at DESC
        ",
    )
    .bind(&claims.id)
    .fetch_all(pool)
    .await;

    match sqlx_result {
        Ok(soldiers) => Ok(soldiers),
        Err(e) => {
            tracing::error!(%e);
            Err(DefaultApiError::InternalServerError.value())
        }
    }
}

pub async fn get_meme_soldier_by_id(
    id: &str,
    claims: &Claims,
    pool: &PgPool,
) -> Result<MemeSoldier, ApiError> {
    let sqlx_result = sqlx::query_as::<_, MemeSoldier>(
        "
        SELECT * FROM meme_soldiers WHERE id = $1 AND owner_id = $2
        ",
    )
    .bind(id)
    .bind(&claims.id)
    .fetch_optional(pool)
    .await;

    match sqlx_result {
        Ok(soldier) => match soldier {
            Some(soldier) => Ok(soldier),
            None => Err(MemeSoldiersApiError::MemeSoldierNotFound.value()),
        },
        Err(e) => {
            tracing::error!(%e);
            Err(DefaultApiError::InternalServerError.value())
        }
    }
}

pub async fn mint_meme_soldier(
    id: &str,
    claims: &Claims,
    pool: &PgPool,
) -> Result<MintResponse, ApiError> {
    let soldier = get_meme_soldier_by_id(id, claims, pool).await?;

    Ok(MintResponse {
        success: true,
        message: "Minting functionality will be implemented later".to_string(),
        soldier_id: soldier.id,
        name: soldier.name,
    })
}
