use std::collections::{BTreeSet, HashMap};

use sea_query::{Expr, Iden, OnConflict, PostgresQueryBuilder, Query};
use sea_query_binder::{SqlxBinder, SqlxValues};
use sqlx::PgExecutor;

use super::Db;
use crate::{
    error::AppError,
    revindex::{self, Index, SearchResults},
};

#[derive(Iden)]
enum Words {
    Table,
    Id,
    Word,
}

#[derive(Iden)]
enum Titles {
    Table,
    Id,
    Title,
}

#[derive(Iden)]
enum WordTitle {
    Table,
    WordId,
    TitleId,
}

fn add_title_query(title: &str) -> Result<(String, SqlxValues), AppError> {
    Ok(Query::insert()
        .into_table(Titles::Table)
        .columns([Titles::Title])
        .values([title.into()])?
        .on_conflict(
            OnConflict::column(Titles::Title)
                .update_column(Titles::Title)
                .to_owned(),
        )
        .returning_col(Titles::Id)
        .build_sqlx(PostgresQueryBuilder))
}

fn add_word_query(word: &str) -> Result<(String, SqlxValues), AppError> {
    Ok(Query::insert()
        .into_table(Words::Table)
        .columns([Words::Word])
        .values([word.into()])?
        .on_conflict(
            OnConflict::column(Words::Word)
                .update_column(Words::Word)
                .to_owned(),
        )
        .returning_col(Words::Id)
        .build_sqlx(PostgresQueryBuilder))
}

fn add_word_titles_query(
    word_id: i32,
    title_ids: &[i32],
) -> Result<(String, SqlxValues), AppError> {
    let mut insert = Query::insert();
    insert
        .into_table(WordTitle::Table)
        .columns([WordTitle::WordId, WordTitle::TitleId]);
    for &title_id in title_ids {
        insert.values([word_id.into(), title_id.into()])?;
    }
    Ok(insert
        .on_conflict(
            OnConflict::columns([WordTitle::WordId, WordTitle::TitleId])
                .do_nothing()
                .to_owned(),
        )
        .build_sqlx(PostgresQueryBuilder))
}

fn word_titles_query(words: &BTreeSet<String>) -> (String, SqlxValues) {
    Query::select()
        .column((Words::Table, Words::Word))
        .column((Titles::Table, Titles::Title))
        .from(WordTitle::Table)
        .inner_join(
            Words::Table,
            Expr::col((Words::Table, Words::Id)).equals((WordTitle::Table, WordTitle::WordId)),
        )
        .inner_join(
            Titles::Table,
            Expr::col((Titles::Table, Titles::Id)).equals((WordTitle::Table, WordTitle::TitleId)),
        )
        .and_where(Expr::col((Words::Table, Words::Word)).is_in(words.iter().cloned()))
        .build_sqlx(PostgresQueryBuilder)
}

async fn upsert_id<'e>(
    executor: impl PgExecutor<'e>,
    (query, values): (String, SqlxValues),
) -> Result<i32, AppError> {
    Ok(sqlx::query_scalar_with::<_, i32, _>(&query, values)
        .fetch_one(executor)
        .await?)
}

pub async fn add_title<'e>(executor: impl PgExecutor<'e>, title: &str) -> Result<i32, AppError> {
    upsert_id(executor, add_title_query(title)?).await
}

pub async fn add_word<'e>(executor: impl PgExecutor<'e>, word: &str) -> Result<i32, AppError> {
    upsert_id(executor, add_word_query(word)?).await
}

pub async fn add_word_titles<'e>(
    executor: impl PgExecutor<'e>,
    word_id: i32,
    title_ids: &[i32],
) -> Result<(), AppError> {
    if title_ids.is_empty() {
        return Ok(());
    }
    let (query, values) = add_word_titles_query(word_id, title_ids)?;
    sqlx::query_with(&query, values).execute(executor).await?;
    Ok(())
}

impl Db {
    pub async fn save_index(&self, index: &Index) -> Result<(), AppError> {
        let mut transaction = self.pool.begin().await?;

        let mut title_ids = Vec::with_capacity(index.titles().len());
        for title in index.titles() {
            title_ids.push(add_title(&mut *transaction, title).await?);
        }

        for (word, positions) in index.entries() {
            let word_id = add_word(&mut *transaction, word).await?;
            let linked: Vec<i32> = positions
                .iter()
                .map(|&position| title_ids[position])
                .collect();
            add_word_titles(&mut *transaction, word_id, &linked).await?;
        }

        transaction.commit().await?;
        tracing::info!(
            titles = title_ids.len(),
            words = index.word_count(),
            "Saved index to database"
        );
        Ok(())
    }

    pub async fn find(&self, phrase: &str) -> Result<SearchResults, AppError> {
        let phrase_words: Vec<String> = revindex::words(phrase).collect();
        let distinct: BTreeSet<String> = phrase_words.iter().cloned().collect();
        if distinct.is_empty() {
            return Ok(SearchResults::new());
        }

        let (query, values) = word_titles_query(&distinct);
        let rows = sqlx::query_as_with::<_, (String, String), _>(&query, values)
            .fetch_all(&self.pool)
            .await?;

        let mut titles_by_word: HashMap<String, Vec<String>> = HashMap::new();
        for (word, title) in rows {
            titles_by_word.entry(word).or_default().push(title);
        }
        Ok(count_entries(&phrase_words, &titles_by_word))
    }
}

fn count_entries(
    phrase_words: &[String],
    titles_by_word: &HashMap<String, Vec<String>>,
) -> SearchResults {
    let mut results = SearchResults::new();
    for titles in phrase_words
        .iter()
        .filter_map(|word| titles_by_word.get(word))
    {
        for title in titles {
            *results.entry(title.clone()).or_default() += 1;
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upserts_return_ids() {
        let (query, values) = add_word_query("cats").unwrap();

        assert!(query.starts_with(r#"INSERT INTO "words" ("word") VALUES ($1)"#));
        assert!(query.contains(r#"ON CONFLICT ("word") DO UPDATE"#));
        assert!(query.ends_with(r#"RETURNING "id""#));
        assert_eq!(values.0 .0.len(), 1);

        let (query, _) = add_title_query("a.txt").unwrap();
        assert!(query.starts_with(r#"INSERT INTO "titles" ("title")"#));
        assert!(query.ends_with(r#"RETURNING "id""#));
    }

    #[test]
    fn links_ignore_existing_rows() {
        let (query, values) = add_word_titles_query(7, &[1, 2, 3]).unwrap();

        assert!(query.starts_with(r#"INSERT INTO "word_title" ("word_id", "title_id")"#));
        assert!(query.contains("($5, $6)"));
        assert!(query.ends_with("DO NOTHING"));
        assert_eq!(values.0 .0.len(), 6);
    }

    #[test]
    fn lookup_binds_each_distinct_word_once() {
        let words = BTreeSet::from(["cats".to_string(), "toys".to_string()]);
        let (query, values) = word_titles_query(&words);

        assert!(query.starts_with(r#"SELECT "words"."word", "titles"."title" FROM "word_title""#));
        assert!(query.contains(r#""words"."word" IN ($1, $2)"#));
        assert_eq!(values.0 .0.len(), 2);
    }

    #[test]
    fn counts_every_phrase_word() {
        let titles_by_word = HashMap::from([
            ("a".to_string(), vec!["0".to_string()]),
            ("b".to_string(), vec!["0".to_string(), "1".to_string()]),
        ]);
        let phrase: Vec<String> = revindex::words("a A b zzz").collect();

        let results = count_entries(&phrase, &titles_by_word);

        assert_eq!(
            results,
            SearchResults::from([("0".to_string(), 3), ("1".to_string(), 1)])
        );
    }
}
