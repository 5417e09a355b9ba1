/// One line typed at the prompt. Index arguments stay raw so bad input can be
/// reported against the list it was meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that isn't a known command
    Search(String),
    /// `None` means ask for the seed query
    Radio(Option<String>),
    ShowPlaylist,
    PlayAll,
    Remove(String),
    Clear,
    History,
    Favorites,
    Favorite(String),
    Unfavorite(String),
    PlayFavorite(String),
    ClearHistory,
    ClearFavorites,
    ToggleShuffle,
    ToggleRepeat,
    Help,
    Quit,
    /// Known command, missing its argument
    Usage(&'static str),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let head = head.to_lowercase();
        let arg = || rest.to_string();

        match (head.as_str(), rest.is_empty()) {
            ("q", true) => Command::Quit,
            ("help", true) => Command::Help,
            ("playlist", true) => Command::ShowPlaylist,
            ("playall", true) => Command::PlayAll,
            ("clear", true) => Command::Clear,
            ("history", true) => Command::History,
            ("favorites", true) => Command::Favorites,
            ("clearhistory", true) => Command::ClearHistory,
            ("clearfavs", true) => Command::ClearFavorites,
            ("shuffle", true) => Command::ToggleShuffle,
            ("repeat", true) => Command::ToggleRepeat,

            ("radio" | "r", true) => Command::Radio(None),
            ("radio", false) => Command::Radio(Some(arg())),

            ("remove", false) => Command::Remove(arg()),
            ("fav", false) => Command::Favorite(arg()),
            ("unfav", false) => Command::Unfavorite(arg()),
            ("playfav", false) => Command::PlayFavorite(arg()),
            ("remove", true) => Command::Usage("remove <n>"),
            ("fav", true) => Command::Usage("fav <n>"),
            ("unfav", true) => Command::Usage("unfav <n>"),
            ("playfav", true) => Command::Usage("playfav <n>"),

            _ => Command::Search(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
Commands:
  <song name>      search and play the top result (added to the playlist)
  radio <query>    play several results for a query (r prompts for one)
  playlist         show the playlist
  playall          play the whole playlist
  remove <n>       remove playlist entry n
  clear            empty the playlist
  shuffle          toggle shuffle
  repeat           toggle repeat
  history          show recently played tracks
  fav <n>          add history entry n to favorites
  favorites        show favorites
  playfav <n>      play favorite n
  unfav <n>        remove favorite n
  clearhistory     forget play history
  clearfavs        forget favorites
  q                quit

While playing: space pause/resume, n next, q stop, +/- volume";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands_ignore_case() {
        assert_eq!(Command::parse("PlayAll"), Command::PlayAll);
        assert_eq!(Command::parse("  SHUFFLE "), Command::ToggleShuffle);
        assert_eq!(Command::parse("Q"), Command::Quit);
        assert_eq!(Command::parse("clearfavs"), Command::ClearFavorites);
        assert_eq!(Command::parse(""), Command::Empty);
    }

    #[test]
    fn test_index_arguments_stay_raw() {
        assert_eq!(Command::parse("remove 5"), Command::Remove("5".to_string()));
        assert_eq!(Command::parse("FAV  two"), Command::Favorite("two".to_string()));
        assert_eq!(Command::parse("unfav 1"), Command::Unfavorite("1".to_string()));
        assert_eq!(Command::parse("playfav 3"), Command::PlayFavorite("3".to_string()));
        assert_eq!(Command::parse("remove"), Command::Usage("remove <n>"));
    }

    #[test]
    fn test_radio_forms() {
        assert_eq!(
            Command::parse("radio lo-fi beats"),
            Command::Radio(Some("lo-fi beats".to_string()))
        );
        assert_eq!(Command::parse("r"), Command::Radio(None));
        assert_eq!(Command::parse("Radio"), Command::Radio(None));
    }

    #[test]
    fn test_everything_else_is_a_search() {
        assert_eq!(
            Command::parse("Bohemian Rhapsody"),
            Command::Search("Bohemian Rhapsody".to_string())
        );
        // Known words with trailing text are searches too
        assert_eq!(
            Command::parse("history of rock"),
            Command::Search("history of rock".to_string())
        );
        assert_eq!(Command::parse("r kelly"), Command::Search("r kelly".to_string()));
    }

    #[test]
    fn test_only_listed_words_are_commands() {
        for word in ["quit", "exit", "favs", "?"] {
            assert_eq!(Command::parse(word), Command::Search(word.to_string()));
        }
        assert_eq!(Command::parse("help"), Command::Help);
    }
}
