use serde::Serialize;

/// Root of a parsed configuration, handed whole to the bundler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct App {
    pub packages: Vec<Package>,
    pub routes: Vec<Route>,
    pub ui: Ui,
    pub middlewares: Vec<String>,
}

impl App {
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Root routes followed by every package's nested routes.
    pub fn all_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().chain(self.packages.iter().flat_map(|p| p.routes.iter()))
    }

    pub fn error404_route(&self) -> Option<&Route> {
        self.all_routes().find(|r| r.error404)
    }

    pub fn index_route(&self) -> Option<&Route> {
        self.all_routes().find(|r| r.index)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub requires: Vec<String>,
    pub directories: Vec<String>,
    pub files: Vec<String>,
    pub options: Vec<String>,
    pub routes: Vec<Route>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.starts_with(ANONYMOUS_PREFIX)
    }
}

pub const ANONYMOUS_PREFIX: &str = "anonymous-";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: String,
    pub template: String,
    pub depends: Vec<String>,
    pub layout: Option<String>,
    pub error404: bool,
    pub index: bool,
    pub private: bool,
    pub dialog: bool,
}

/// Accumulates one route statement; options may repeat, last write wins.
#[derive(Debug, Default)]
pub struct RouteBuilder {
    path: String,
    template: String,
    depends: Vec<String>,
    layout: Option<String>,
    error404: bool,
    index: bool,
    private: bool,
    dialog: bool,
}

impl RouteBuilder {
    pub fn new(path: impl Into<String>, template: impl Into<String>) -> Self {
        Self { path: path.into(), template: template.into(), ..Self::default() }
    }

    pub fn depend(&mut self, name: impl Into<String>) -> &mut Self {
        self.depends.push(name.into());
        self
    }

    pub fn layout(&mut self, layout: impl Into<String>) -> &mut Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn option(&mut self, option: RouteOption) -> &mut Self {
        match option {
            RouteOption::Error404 => self.error404 = true,
            RouteOption::Index => self.index = true,
            RouteOption::Private => self.private = true,
            RouteOption::Dialog => self.dialog = true,
        }
        self
    }

    pub fn build(self) -> Route {
        Route {
            path: self.path,
            template: self.template,
            depends: self.depends,
            layout: self.layout,
            error404: self.error404,
            index: self.index,
            private: self.private,
            dialog: self.dialog,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOption {
    Error404,
    Index,
    Private,
    Dialog,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ui {
    pub template: Vec<String>,
    pub assets: Vec<String>,
    pub javascript: Vec<String>,
    pub stylesheets: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiField {
    Template,
    Assets,
    Javascript,
    Stylesheets,
}

impl Ui {
    pub fn field_mut(&mut self, field: UiField) -> &mut Vec<String> {
        match field {
            UiField::Template => &mut self.template,
            UiField::Assets => &mut self.assets,
            UiField::Javascript => &mut self.javascript,
            UiField::Stylesheets => &mut self.stylesheets,
        }
    }
}
