//! Interactive menus
//!
//! A [`Session`] owns the database handle, the recommender and the prompt.
//! Menus loop until the user backs out; end of input leaves every menu the
//! same way as choosing "exit".

use crate::prompt::Prompt;
use mvb_common::db::{movies, users, watch_history, HistoryEntry, MovieSummary, User, WatchFlags};
use mvb_common::{Error, Result};
use mvb_rec::{Recommender, SqliteCatalog};
use sqlx::SqlitePool;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Similar movies listed from a movie selection
pub const SIMILAR_SHOWN: usize = 6;

const GOODBYE: &str = "\nGoodbye. Shutting down...";

/// One interactive terminal session
pub struct Session<R, W> {
    pool: SqlitePool,
    recommender: Recommender<SqliteCatalog>,
    prompt: Prompt<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        pool: SqlitePool,
        recommender: Recommender<SqliteCatalog>,
        prompt: Prompt<R, W>,
    ) -> Self {
        Self {
            pool,
            recommender,
            prompt,
        }
    }

    /// Consume the session, returning the prompt (and with it the output)
    pub fn into_prompt(self) -> Prompt<R, W> {
        self.prompt
    }

    /// Run until the user exits
    pub async fn run(&mut self) -> Result<()> {
        self.prompt.say("Welcome to the Movie Browser System.")?;

        let mut current = self.manage_users().await?;
        while let Some(user) = current {
            current = self.main_menu(user).await?;
        }

        info!("Session ended");
        Ok(())
    }

    // ========================================================================
    // User menu
    // ========================================================================

    /// Create, delete or log in users. Returns the logged-in user, or `None`
    /// if the user chose to exit.
    pub async fn manage_users(&mut self) -> Result<Option<User>> {
        loop {
            self.prompt.say("To create a new user, enter 1.")?;
            self.prompt.say("To manage existing users, enter 2.")?;
            self.prompt.say("Enter anything else to exit the program.")?;

            match self.prompt.ask("Enter your choice: ")?.as_deref() {
                Some("1") => self.create_user().await?,
                Some("2") => {
                    if let Some(user) = self.existing_users().await? {
                        return Ok(Some(user));
                    }
                }
                _ => {
                    self.prompt.say(GOODBYE)?;
                    return Ok(None);
                }
            }
            self.prompt.say("")?;
        }
    }

    async fn create_user(&mut self) -> Result<()> {
        loop {
            self.prompt.say("\nTo create a new user, please enter a unique username.")?;
            self.prompt.say("To return to the previous menu, enter 0.")?;

            let Some(username) = self.prompt.ask("Enter your choice: ")? else {
                return Ok(());
            };
            if username == "0" {
                return Ok(());
            }

            self.prompt.say(format!(
                "This will create a new user with the username \"{}\".",
                username
            ))?;
            if !self.prompt.confirm("Enter y to confirm or anything else to cancel: ")? {
                return Ok(());
            }

            match users::create_user(&self.pool, &username).await {
                Ok(user) => {
                    self.prompt.say(format!(
                        "New user \"{}\" created successfully.",
                        user.username
                    ))?;
                    return Ok(());
                }
                Err(Error::Conflict(_)) => {
                    self.prompt
                        .say("That username already exists. Please choose a different one.")?;
                }
                Err(Error::InvalidInput(reason)) => {
                    self.prompt.say(format!("Invalid username: {}.", reason))?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn existing_users(&mut self) -> Result<Option<User>> {
        let all_users = users::list_users(&self.pool).await?;
        if all_users.is_empty() {
            self.prompt.say("No existing users.")?;
            return Ok(None);
        }

        self.prompt.say("Here are the existing users:")?;
        for (index, user) in all_users.iter().enumerate() {
            self.prompt.say(format!("\t{} - {}", index + 1, user.username))?;
        }

        let selection = self.prompt.select(all_users.len())?;
        if selection == 0 {
            return Ok(None);
        }
        let username = all_users[selection - 1].username.clone();

        let action = self.prompt.ask(
            "Enter 1 to log in as the selected user, enter 2 to delete the selected user, \
             or enter anything else to cancel selection: ",
        )?;

        match action.as_deref() {
            Some("1") => {
                self.prompt.say(format!("Logging in as user \"{}\".", username))?;
                let user = users::login_user(&self.pool, &username).await?;
                info!(user_id = user.id, username = %user.username, "Logged in");
                Ok(Some(user))
            }
            Some("2") => {
                self.prompt.say(format!(
                    "You have selected to delete the user \"{}\".",
                    username
                ))?;
                if self.prompt.confirm("Enter y to confirm, or anything else to cancel: ")? {
                    users::delete_user(&self.pool, &username).await?;
                    self.prompt
                        .say(format!("Successfully deleted the user \"{}\".", username))?;
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    // ========================================================================
    // Main menu
    // ========================================================================

    /// Run the main menu for `user` until they change user or exit.
    /// Returns the next user, or `None` to end the session.
    pub async fn main_menu(&mut self, user: User) -> Result<Option<User>> {
        loop {
            self.prompt.say(format!("\nHello, {}", user.username))?;
            self.prompt.say("To look up a movie, enter 1.")?;
            self.prompt.say("To see recommended movies, enter 2.")?;
            self.prompt.say("To see your watch history, enter 3.")?;
            self.prompt.say("To change users, enter 4.")?;
            self.prompt.say("Enter anything else to exit the program.")?;

            match self.prompt.ask("Enter your choice: ")?.as_deref() {
                Some("1") => {
                    if let Some(movie) = self.lookup(&user).await? {
                        self.movie_selection(&user, movie).await?;
                    }
                }
                Some("2") => self.recommendations(&user).await?,
                Some("3") => self.history(&user).await?,
                Some("4") => {
                    let question = format!(
                        "\nLog out from current user \"{}\"?\nEnter y to confirm: ",
                        user.username
                    );
                    if self.prompt.confirm(&question)? {
                        self.prompt.say("Logging out...\n")?;
                        info!(user_id = user.id, "Logged out");
                        return self.manage_users().await;
                    }
                }
                _ => {
                    self.prompt.say(GOODBYE)?;
                    return Ok(None);
                }
            }
        }
    }

    /// Search titles until something matches, then let the user pick one
    async fn lookup(&mut self, user: &User) -> Result<Option<MovieSummary>> {
        let (fragment, results) = loop {
            let Some(fragment) =
                self.prompt.ask("Please enter the name of the movie you want to find: ")?
            else {
                return Ok(None);
            };

            let results = movies::search_titles(&self.pool, &fragment, user.id).await?;
            debug!(fragment = %fragment, matches = results.len(), "Title search");
            if !results.is_empty() {
                break (fragment, results);
            }
            self.prompt.say("No results for that search. Please try again.")?;
        };

        self.prompt.say(format!(
            "Here are the first {} closest results to \"{}\":",
            movies::SEARCH_LIMIT,
            fragment
        ))?;
        self.list_titles(results.iter().map(|m| m.title.as_str()))?;

        match self.prompt.select(results.len())? {
            0 => Ok(None),
            selection => Ok(results.into_iter().nth(selection - 1)),
        }
    }

    async fn recommendations(&mut self, user: &User) -> Result<()> {
        self.prompt.say(format!(
            "\nHere are the recommended movies for \"{}\" based on watch history:",
            user.username
        ))?;

        let recommended = self.recommender.recommend_from_history(user.id).await?;
        if recommended.is_empty() {
            self.prompt.say("There are no movies left to recommend.")?;
            return Ok(());
        }

        for (index, rec) in recommended.iter().enumerate() {
            self.prompt.say(format!("\t{} - {} {}", index + 1, rec.title, rec.reason))?;
        }

        let selection = self.prompt.select(recommended.len())?;
        if selection > 0 {
            let rec = &recommended[selection - 1];
            let movie = MovieSummary {
                id: rec.movie_id,
                title: rec.title.clone(),
            };
            self.movie_selection(user, movie).await?;
        }
        Ok(())
    }

    async fn history(&mut self, user: &User) -> Result<()> {
        let entries = watch_history::watch_history(&self.pool, user.id).await?;
        if entries.is_empty() {
            self.prompt
                .say(format!("No watch history for \"{}\".", user.username))?;
            return Ok(());
        }

        self.prompt
            .say(format!("\nHere is the watch history for \"{}\":", user.username))?;
        for line in history_table(&entries) {
            self.prompt.say(line)?;
        }

        if self
            .prompt
            .confirm("Would you like to edit items in watch history? Enter y to confirm: ")?
        {
            let selection = self.prompt.select(entries.len())?;
            if selection > 0 {
                let entry = &entries[selection - 1];
                let movie = MovieSummary {
                    id: entry.movie_id,
                    title: entry.title.clone(),
                };
                self.movie_selection(user, movie).await?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Movie selection
    // ========================================================================

    /// Update the watch record for a movie or browse movies similar to it.
    /// Drilling into a similar movie makes it the new selection.
    pub async fn movie_selection(&mut self, user: &User, movie: MovieSummary) -> Result<()> {
        let mut movie = movie;

        loop {
            self.prompt
                .say(format!("\nYou have selected the movie \"{}\".", movie.title))?;
            self.prompt.say(
                "Enter 1 to update watch history for this movie, enter 2 to find similar movies, \
                 or enter 0 to return to the main menu.",
            )?;

            match self.prompt.select(2)? {
                1 => {
                    if let Some(flags) = self.review(&movie.title)? {
                        watch_history::upsert_watch_record(&self.pool, user.id, movie.id, flags)
                            .await?;
                        self.prompt.say(format!(
                            "Watch history for \"{}\" successfully updated.",
                            movie.title
                        ))?;
                    }
                    return Ok(());
                }
                2 => {
                    self.prompt
                        .say(format!("Here are movies similar to \"{}\":", movie.title))?;

                    let similar = self
                        .recommender
                        .get_similar_movies(movie.id, user.id, SIMILAR_SHOWN)
                        .await?;
                    self.list_titles(similar.iter().map(|m| m.title.as_str()))?;

                    match self.prompt.select(similar.len())? {
                        0 => return Ok(()),
                        selection => movie = similar[selection - 1].clone(),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Ask the three watch-history questions. `None` if input ran out.
    fn review(&mut self, title: &str) -> Result<Option<WatchFlags>> {
        let questions = [
            format!("\nHave you watched {}? Enter y for yes, n for no: ", title),
            format!("Did you like {}? Enter y for yes, n for no: ", title),
            format!(
                "Would you like to ignore {} in future searches? Enter y for yes, n for no: ",
                title
            ),
        ];

        let mut answers = [false; 3];
        for (answer, question) in answers.iter_mut().zip(&questions) {
            match self.prompt.yes_no(question)? {
                Some(yes) => *answer = yes,
                None => return Ok(None),
            }
        }

        let [watched, liked, ignored] = answers;
        Ok(Some(WatchFlags {
            watched,
            liked,
            ignored,
        }))
    }

    fn list_titles<'a>(&mut self, titles: impl Iterator<Item = &'a str>) -> Result<()> {
        for (index, title) in titles.enumerate() {
            self.prompt.say(format!("\t{} - {}", index + 1, title))?;
        }
        Ok(())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Render watch history as aligned rows, numbered from 1
pub fn history_table(entries: &[HistoryEntry]) -> Vec<String> {
    let title_width = entries
        .iter()
        .map(|e| e.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("Movie Title".len());
    let number_width = entries.len().to_string().len();

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(format!(
        "{:>nw$}  {:<tw$}  Watched  Liked  Ignored",
        "",
        "Movie Title",
        nw = number_width,
        tw = title_width
    ));

    for (index, entry) in entries.iter().enumerate() {
        lines.push(format!(
            "{:>nw$}  {:<tw$}  {:<7}  {:<5}  {}",
            index + 1,
            entry.title,
            yes_no(entry.flags.watched),
            yes_no(entry.flags.liked),
            yes_no(entry.flags.ignored),
            nw = number_width,
            tw = title_width
        ));
    }
    lines
}
