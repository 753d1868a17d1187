use std::num::NonZeroU64;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use thiserror::Error;

use crate::api::{self, ApiError, CatalogClient, ClientOptions, Pokemon};
use crate::controller::{Command, ControlError, Controller, Effect, PageFetch, DEFAULT_PAGE_SIZE};
use crate::pagination::PaginationPlan;

#[derive(Clone, Debug)]
pub struct ViewerOptions {
    pub base_url: String,
    pub resource: String,
    pub page_size: u64,
    pub start_page: u64,
    pub concurrency: usize,
    pub rate: u32,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
    pub user_agent: String,
    pub follow_redirects: bool,
    pub verbose: u8,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
            resource: api::DEFAULT_RESOURCE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            start_page: 1,
            concurrency: 1,
            rate: 20,
            timeout_seconds: 10,
            proxy: None,
            user_agent: api::DEFAULT_USER_AGENT.to_string(),
            follow_redirects: true,
            verbose: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid page_size {value}, expected positive integer")]
    InvalidPageSize { value: u64 },

    #[error("invalid start_page {value}, expected positive integer")]
    InvalidStartPage { value: u64 },

    #[error("invalid rate {value}, expected positive integer")]
    InvalidRate { value: u32 },

    #[error("invalid concurrency {value}, expected positive integer")]
    InvalidConcurrency { value: usize },

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Everything the presentation layer needs to draw one screen.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Page {
        cards: Vec<Pokemon>,
        plan: PaginationPlan,
        page: u64,
        total_pages: u64,
        total_items: u64,
    },
    SearchHit {
        card: Pokemon,
    },
    NotFound {
        term: String,
    },
    Details(Pokemon),
    Help,
    Quit,
}

pub struct Viewer {
    options: ViewerOptions,
    client: CatalogClient,
    controller: Controller,
    cards: Vec<Pokemon>,
    last_screen: Option<Screen>,
    show_progress: bool,
}

impl Viewer {
    pub fn new(options: ViewerOptions) -> Result<Self, ViewerError> {
        let page_size = NonZeroU64::new(options.page_size).ok_or(ViewerError::InvalidPageSize {
            value: options.page_size,
        })?;
        if options.start_page == 0 {
            return Err(ViewerError::InvalidStartPage {
                value: options.start_page,
            });
        }
        if options.rate == 0 {
            return Err(ViewerError::InvalidRate {
                value: options.rate,
            });
        }
        if options.concurrency == 0 {
            return Err(ViewerError::InvalidConcurrency {
                value: options.concurrency,
            });
        }
        let client = CatalogClient::new(ClientOptions {
            base_url: options.base_url.clone(),
            resource: options.resource.clone(),
            timeout_seconds: options.timeout_seconds,
            rate: options.rate,
            proxy: options.proxy.clone(),
            user_agent: options.user_agent.clone(),
            follow_redirects: options.follow_redirects,
            verbose: options.verbose,
        })?;
        Ok(Self {
            options,
            client,
            controller: Controller::new(page_size),
            cards: Vec::new(),
            last_screen: None,
            show_progress: false,
        })
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn cards(&self) -> &[Pokemon] {
        &self.cards
    }

    /// Shows a progress bar on stderr while card details are fetched.
    pub fn set_progress(&mut self, enabled: bool) {
        self.show_progress = enabled;
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(0);
        pb.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template(
            ":: Loading: [{pos}/{len}] :: Duration: [{elapsed_precise}] :: {msg}",
        ) {
            pb.set_style(style.progress_chars(r#"#>-"#));
        }
        pb
    }

    /// Loads the configured start page.
    pub async fn open(&mut self) -> Result<Screen, ViewerError> {
        let saved = self.controller.clone();
        let effect = self.controller.seek(self.options.start_page);
        self.perform_or_restore(effect, saved).await
    }

    /// Applies `command` and performs its effect. A failed fetch leaves the
    /// controller as it was before the command.
    pub async fn dispatch(&mut self, command: Command) -> Result<Screen, ViewerError> {
        let saved = self.controller.clone();
        let effect = self.controller.apply(command)?;
        self.perform_or_restore(effect, saved).await
    }

    async fn perform_or_restore(
        &mut self,
        effect: Effect,
        saved: Controller,
    ) -> Result<Screen, ViewerError> {
        let result = self.perform(effect).await;
        if result.is_err() {
            self.controller = saved;
        }
        result
    }

    async fn perform(&mut self, effect: Effect) -> Result<Screen, ViewerError> {
        match effect {
            Effect::FetchPage(fetch) => self.load_page(fetch).await,
            Effect::FetchByName(term) => self.load_search(term).await,
            Effect::ShowDetails(index) => {
                let card = self
                    .cards
                    .get(index)
                    .cloned()
                    .ok_or(ControlError::NoSuchCard { index: index + 1 })?;
                Ok(Screen::Details(card))
            }
            // Details overlay the grid; closing them redraws what was underneath.
            Effect::Redraw => match self.last_screen.clone() {
                Some(screen) => Ok(screen),
                None => self.load_page(self.controller.current_fetch()).await,
            },
            Effect::ShowHelp => Ok(Screen::Help),
            Effect::Quit => Ok(Screen::Quit),
        }
    }

    async fn load_page(&mut self, fetch: PageFetch) -> Result<Screen, ViewerError> {
        let listing = self.client.list_page(fetch.limit, fetch.offset).await?;
        self.controller.record_total(listing.count);
        let pb = self.progress_bar();
        pb.set_message(format!("page {}", fetch.page));
        let cards = self
            .client
            .fetch_cards(&listing.results, self.options.concurrency, &pb)
            .await?;
        self.set_cards(cards);
        let screen = Screen::Page {
            cards: self.cards.clone(),
            plan: self.controller.plan(),
            page: fetch.page,
            total_pages: self.controller.total_pages(),
            total_items: listing.count,
        };
        self.last_screen = Some(screen.clone());
        Ok(screen)
    }

    async fn load_search(&mut self, term: String) -> Result<Screen, ViewerError> {
        let screen = match self.client.fetch_by_name(&term).await {
            Ok(card) => {
                self.set_cards(vec![card.clone()]);
                Screen::SearchHit { card }
            }
            Err(ApiError::NotFound { .. }) => {
                self.set_cards(Vec::new());
                Screen::NotFound { term }
            }
            Err(e) => return Err(e.into()),
        };
        self.last_screen = Some(screen.clone());
        Ok(screen)
    }

    fn set_cards(&mut self, cards: Vec<Pokemon>) {
        self.controller.record_visible_cards(cards.len());
        self.cards = cards;
    }
}
