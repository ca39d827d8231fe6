//! Catalog CSV ingestion
//!
//! Reads the IMDb top-1000 layout positionally (header row skipped):
//!
//! | col | field         | col | field       |
//! |-----|---------------|-----|-------------|
//! | 0   | Poster_Link   | 8   | Meta_score  |
//! | 1   | Series_Title  | 9   | Director    |
//! | 2   | Released_Year | 10  | Star1       |
//! | 3   | Certificate   | 11  | Star2       |
//! | 4   | Runtime       | 12  | Star3       |
//! | 5   | Genre         | 13  | Star4       |
//! | 6   | IMDB_Rating   | 14  | No_of_Votes |
//! | 7   | Overview      | 15  | Gross       |
//!
//! Columns past Star4 are ignored. Numeric fields that do not parse are
//! stored as NULL.

use csv::{ReaderBuilder, StringRecord};
use mvb_common::db::{movies, NewMovie};
use mvb_common::{Error, Result};
use mvb_rec::TextNormalizer;
use sqlx::SqlitePool;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Parse catalog rows and compute their similarity tags
pub fn read_catalog<R: Read>(reader: R, normalizer: &TextNormalizer) -> Result<Vec<NewMovie>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut catalog = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        match parse_record(&record, normalizer) {
            Some(movie) => catalog.push(movie),
            // index 0 is the first line after the header
            None => warn!(line = index + 2, "Skipping catalog row without a title"),
        }
    }

    debug!(rows = catalog.len(), "Parsed catalog CSV");
    Ok(catalog)
}

/// [`read_catalog`] over a file
pub fn read_catalog_file(path: &Path, normalizer: &TextNormalizer) -> Result<Vec<NewMovie>> {
    let file = std::fs::File::open(path)?;
    read_catalog(file, normalizer)
}

/// Seed the movies table from `csv_path` if it is empty
///
/// Returns the number of movies inserted (0 when the catalog was already
/// populated). An empty catalog with no CSV to load is a configuration error.
pub async fn load_catalog_if_empty(pool: &SqlitePool, csv_path: Option<&Path>) -> Result<usize> {
    if !movies::catalog_is_empty(pool).await? {
        debug!("Catalog already populated");
        return Ok(0);
    }

    let Some(path) = csv_path else {
        return Err(Error::Config(
            "movie catalog is empty and no catalog CSV was configured (use --catalog or catalog_csv)"
                .to_string(),
        ));
    };

    info!("Loading movie catalog from {}", path.display());
    let catalog = read_catalog_file(path, &TextNormalizer::new())?;
    let ids = movies::insert_movies(pool, &catalog).await?;

    info!(count = ids.len(), "Movie catalog loaded");
    Ok(ids.len())
}

fn parse_record(record: &StringRecord, normalizer: &TextNormalizer) -> Option<NewMovie> {
    let text = |i: usize| record.get(i).unwrap_or("").trim();
    let optional = |i: usize| Some(text(i)).filter(|s| !s.is_empty()).map(str::to_string);

    let title = text(1);
    if title.is_empty() {
        return None;
    }

    let genre = text(5).to_string();
    let overview = text(7).to_string();
    let similarity_tags = normalizer.similarity_tag(&genre, &overview);

    Some(NewMovie {
        poster_link: optional(0),
        title: title.to_string(),
        year: parse_integer(text(2)),
        certificate: optional(3),
        runtime: optional(4),
        genre,
        imdb_rating: text(6).parse::<f64>().ok().filter(|r| r.is_finite()),
        overview,
        meta_score: parse_integer(text(8)),
        director: optional(9),
        star1: optional(10),
        star2: optional(11),
        star3: optional(12),
        star4: optional(13),
        similarity_tags,
    })
}

/// Integer fields sometimes arrive as "80.0"
fn parse_integer(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Poster_Link,Series_Title,Released_Year,Certificate,Runtime,Genre,IMDB_Rating,Overview,Meta_score,Director,Star1,Star2,Star3,Star4,No_of_Votes,Gross\n";

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("1994"), Some(1994));
        assert_eq!(parse_integer("80.0"), Some(80));
        assert_eq!(parse_integer("PG"), None);
        assert_eq!(parse_integer("7.5"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn test_read_catalog_row() {
        let csv = format!(
            "{}{}",
            HEADER,
            "https://img/1.jpg,The Shawshank Redemption,1994,A,142 min,Drama,9.3,\"Two imprisoned men bond over a number of years.\",80,Frank Darabont,Tim Robbins,Morgan Freeman,Bob Gunton,William Sadler,2343110,\"28,341,469\"\n"
        );

        let catalog = read_catalog(csv.as_bytes(), &TextNormalizer::new()).unwrap();

        assert_eq!(catalog.len(), 1);
        let movie = &catalog[0];
        assert_eq!(movie.title, "The Shawshank Redemption");
        assert_eq!(movie.year, Some(1994));
        assert_eq!(movie.runtime.as_deref(), Some("142 min"));
        assert_eq!(movie.imdb_rating, Some(9.3));
        assert_eq!(movie.meta_score, Some(80));
        assert_eq!(movie.star4.as_deref(), Some("William Sadler"));
        assert_eq!(movie.similarity_tags, "drama two imprisoned man bond number year");
    }

    #[test]
    fn test_non_numeric_fields_become_null() {
        let csv = format!(
            "{}{}",
            HEADER, "x.jpg,Apollo 13,PG,U,140 min,Adventure,n/a,Astronauts in trouble.,,Ron Howard,Tom Hanks,,,\n"
        );

        let catalog = read_catalog(csv.as_bytes(), &TextNormalizer::new()).unwrap();

        let movie = &catalog[0];
        assert_eq!(movie.year, None);
        assert_eq!(movie.imdb_rating, None);
        assert_eq!(movie.meta_score, None);
        assert_eq!(movie.star2, None);
    }

    #[test]
    fn test_rows_without_title_are_skipped() {
        let csv = format!("{}{}{}", HEADER, "a.jpg,,2000\n", "b.jpg,Heat,1995,R,170 min,Crime,8.3,A heist.,76,Michael Mann,Al Pacino,Robert De Niro,Val Kilmer,Jon Voight\n");

        let catalog = read_catalog(csv.as_bytes(), &TextNormalizer::new()).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].title, "Heat");
    }
}
