//! Headless application: the document, the trip model and the board,
//! wired together. Every entry point finishes all resulting work before it
//! returns.

use std::time::Duration;

use log::info;

use crate::dom::{el, EventKind, NodeId, RenderPosition};
use crate::error::AppResult;
use crate::messages::Message;
use crate::models::{EventType, FilterKind, UpdateType};
use crate::presenter::BoardPresenter;
use crate::store::{TripData, TripModel};
use crate::view::Dom;

pub struct TripApp {
    doc: Dom,
    model: TripModel,
    board: BoardPresenter,
    header: NodeId,
    content: NodeId,
}

impl TripApp {
    pub fn new(default_type: EventType) -> Self {
        let mut doc = Dom::new();
        let body = doc.body();
        let header = doc.create(&el("div").class("trip-main"));
        let content = doc.create(&el("section").class("trip-events"));
        doc.insert(body, header, RenderPosition::BeforeEnd);
        doc.insert(body, content, RenderPosition::BeforeEnd);

        let mut model = TripModel::new(default_type);
        let board = BoardPresenter::new(content, header, &mut model);
        Self {
            doc,
            model,
            board,
            header,
            content,
        }
    }

    /// Renders the loading board and the disabled "New event" trigger.
    pub fn start(&mut self) -> AppResult<()> {
        self.board.init(&mut self.doc, &self.model)?;
        Ok(())
    }

    pub fn load(&mut self, data: TripData) -> AppResult<()> {
        self.model.init(data);
        self.board.sync(&mut self.doc, &self.model)?;
        info!("Board ready");
        Ok(())
    }

    pub fn click(&mut self, node: NodeId) -> AppResult<()> {
        let dispatched = self.doc.click(node);
        self.handle(dispatched.messages)
    }

    pub fn key(&mut self, key: &str) -> AppResult<()> {
        let body = self.doc.body();
        let dispatched = self.doc.dispatch(body, EventKind::Keydown, Some(key));
        self.handle(dispatched.messages)
    }

    pub fn input(&mut self, node: NodeId, value: &str) -> AppResult<()> {
        self.doc.set_value(node, value);
        let dispatched = self.doc.dispatch(node, EventKind::Input, None);
        self.handle(dispatched.messages)
    }

    /// Advances the document clock, finishing any shake that is due.
    pub fn advance(&mut self, elapsed: Duration) -> AppResult<()> {
        let messages = self.doc.advance(elapsed);
        self.handle(messages)
    }

    pub fn set_filter(&mut self, filter: FilterKind) -> AppResult<()> {
        self.model.update_filter_type(UpdateType::Filter, filter);
        self.board.sync(&mut self.doc, &self.model)?;
        Ok(())
    }

    fn handle(&mut self, messages: Vec<Message>) -> AppResult<()> {
        for message in messages {
            self.board.update(message, &mut self.doc, &mut self.model)?;
        }
        Ok(())
    }

    pub fn doc(&self) -> &Dom {
        &self.doc
    }

    pub fn model(&self) -> &TripModel {
        &self.model
    }

    pub fn board(&self) -> &BoardPresenter {
        &self.board
    }

    /// Container the "New event" trigger lives in.
    pub fn header(&self) -> NodeId {
        self.header
    }

    /// Container the board renders into.
    pub fn content(&self) -> NodeId {
        self.content
    }
}
