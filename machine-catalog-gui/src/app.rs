use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Element, Length, Task};
use machine_catalog_core::{CatalogClient, Machine, PAGE_LIMIT, PageEnvelope, PageState};
use std::collections::HashMap;
use std::sync::Arc;

// Grid layout constants: three cards per row like the original catalog page
const GRID_COLUMNS: usize = 3;
const CARD_WIDTH: f32 = 220.0;
const CARD_IMAGE_HEIGHT: f32 = 150.0;

#[derive(Debug, Clone)]
pub enum Message {
    /// A page change was requested from any of the navigation controls.
    /// `None` is the absent cursor from a disabled Previous/Next button.
    PageRequested(Option<i64>),
    PageLoaded {
        seq: u64,
        result: Result<PageEnvelope, String>,
    },
    ThumbnailLoaded {
        url: String,
        result: Result<Vec<u8>, String>,
    },
}

pub struct AppState {
    client: Arc<CatalogClient>,
    page: PageState,
    thumbnails: HashMap<String, image::Handle>,
    is_loading: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            client: Arc::new(CatalogClient::default()),
            page: PageState::new(),
            thumbnails: HashMap::new(),
            is_loading: false,
        }
    }

    /// Issue the fetch for the current page, tagged with a fresh sequence
    /// number so a stale completion can be recognized and dropped.
    fn fetch_current_page(&mut self) -> Task<Message> {
        let seq = self.page.begin_request();
        let page = self.page.current_page;
        let client = self.client.clone();
        self.is_loading = true;

        Task::perform(
            async move {
                client
                    .fetch_page(page, PAGE_LIMIT)
                    .await
                    .map_err(|e| e.to_string())
            },
            move |result| Message::PageLoaded { seq, result },
        )
    }

    /// Kick off one thumbnail fetch per machine whose image has not been
    /// seen yet. Failures only log; the card falls back to a placeholder.
    fn load_missing_thumbnails(&self) -> Task<Message> {
        let mut tasks = Vec::new();

        for machine in &self.page.machines {
            if self.thumbnails.contains_key(&machine.image) {
                continue;
            }

            let client = self.client.clone();
            let url = machine.image.clone();
            tasks.push(Task::perform(
                async move {
                    let result = client
                        .fetch_image_bytes(&url)
                        .await
                        .map_err(|e| e.to_string());
                    (url, result)
                },
                |(url, result)| Message::ThumbnailLoaded { url, result },
            ));
        }

        Task::batch(tasks)
    }
}

pub fn initialize() -> (AppState, Task<Message>) {
    let mut state = AppState::new();

    // Mount fetch for page 1; current_page starts there and navigation is
    // rejected until the first envelope arrives.
    let task = state.fetch_current_page();

    (state, task)
}

pub fn update(state: &mut AppState, message: Message) -> Task<Message> {
    match message {
        Message::PageRequested(target) => {
            if state.page.request_page_change(target) {
                return state.fetch_current_page();
            }
        }
        Message::PageLoaded { seq, result } => match result {
            Ok(envelope) => {
                if state.page.apply_success(seq, envelope, PAGE_LIMIT) {
                    state.is_loading = false;
                    return state.load_missing_thumbnails();
                }
            }
            Err(error) => {
                log::warn!("Failed to fetch machines: {}", error);
                if state.page.apply_failure(seq, error) {
                    state.is_loading = false;
                }
            }
        },
        Message::ThumbnailLoaded { url, result } => match result {
            Ok(bytes) => {
                state
                    .thumbnails
                    .insert(url, image::Handle::from_bytes(bytes));
            }
            Err(error) => {
                log::warn!("Failed to load thumbnail {}: {}", url, error);
            }
        },
    }
    Task::none()
}

fn machine_card<'a>(state: &'a AppState, machine: &'a Machine) -> Element<'a, Message> {
    let thumbnail: Element<Message> = if let Some(handle) = state.thumbnails.get(&machine.image) {
        image::Image::<image::Handle>::new(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(CARD_IMAGE_HEIGHT))
            .into()
    } else {
        // Fallback box while the image loads (or if it never does)
        container(text("Loading image...").size(12))
            .width(Length::Fill)
            .height(Length::Fixed(CARD_IMAGE_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(CARD_IMAGE_HEIGHT))
            .into()
    };

    container(
        column![
            thumbnail,
            text(&machine.title).size(16),
            text(&machine.class_label).size(14),
        ]
        .spacing(5),
    )
    .style(|_theme| container::Style {
        border: iced::Border {
            color: iced::Color::from_rgb(0.5, 0.5, 0.5),
            width: 1.0,
            radius: 4.0.into(),
        },
        ..Default::default()
    })
    .padding(10)
    .width(Length::Fixed(CARD_WIDTH))
    .into()
}

fn navigation_controls(state: &AppState) -> Element<Message> {
    let prev_target = state.page.prev_page.map(|p| p as i64);
    let next_target = state.page.next_page.map(|p| p as i64);

    let mut nav = row![
        button("Previous")
            .on_press_maybe(if state.page.can_go_prev() {
                Some(Message::PageRequested(prev_target))
            } else {
                None
            })
            .padding(5),
    ]
    .spacing(10);

    for page in 1..=state.page.total_pages {
        let style = if page == state.page.current_page {
            button::primary
        } else {
            button::secondary
        };
        nav = nav.push(
            button(text(page.to_string()).size(14))
                .on_press(Message::PageRequested(Some(page as i64)))
                .style(style)
                .padding(5),
        );
    }

    nav = nav.push(
        button("Next")
            .on_press_maybe(if state.page.can_go_next() {
                Some(Message::PageRequested(next_target))
            } else {
                None
            })
            .padding(5),
    );

    container(nav).center_x(Length::Fill).into()
}

fn debug_footer<'a>() -> Element<'a, Message> {
    let history = CatalogClient::api_call_history();

    let last_line = history
        .last()
        .map(|call| {
            let status = if call.status_code == 0 {
                "no response".to_string()
            } else {
                call.status_code.to_string()
            };
            format!(
                "Last request: {} -> {} at {}",
                call.url,
                status,
                call.timestamp
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap_or_else(|_| "unknown time".to_string())
            )
        })
        .unwrap_or_else(|| "No requests issued yet".to_string());

    column![
        text(last_line).size(12),
        text(format!("{} API calls recorded", history.len())).size(12),
    ]
    .spacing(2)
    .into()
}

pub fn view(state: &AppState) -> Element<Message> {
    let header = row![
        text("Machine Catalog").size(20),
        if state.is_loading {
            text("Loading...").size(14)
        } else {
            text("").size(14)
        },
    ]
    .spacing(10);

    let error_section = if let Some(error) = &state.page.last_error {
        column![text("Error:").size(16), text(error).size(14),].spacing(5)
    } else {
        column![]
    };

    let grid_section: Element<Message> = if state.page.machines.is_empty() {
        if state.page.last_error.is_none() {
            container(text("No machines available.").size(16))
                .center_x(Length::Fill)
                .padding(20)
                .into()
        } else {
            column![].into()
        }
    } else {
        let mut grid_rows: Vec<Element<Message>> = Vec::new();
        for chunk in state.page.machines.chunks(GRID_COLUMNS) {
            let cards: Vec<Element<Message>> = chunk
                .iter()
                .map(|machine| machine_card(state, machine))
                .collect();
            grid_rows.push(row(cards).spacing(10).into());
        }
        column(grid_rows).spacing(10).into()
    };

    let content = column![
        header,
        error_section,
        grid_section,
        navigation_controls(state),
        debug_footer(),
    ]
    .spacing(20)
    .padding(20);

    scrollable(content).width(Length::Fill).height(Length::Fill).into()
}
