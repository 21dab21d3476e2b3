//! Routes of the admin shell and the sidebar links pointing at them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    ListaCertificado,
    CargarCertificado,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::ListaCertificado, Route::CargarCertificado];

    pub fn path(self) -> &'static str {
        match self {
            Route::ListaCertificado => "/certificado/lista-certificado",
            Route::CargarCertificado => "/certificado/cargar-certificado",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::ListaCertificado => "Lista de certificados",
            Route::CargarCertificado => "Cargar certificado",
        }
    }

    /// Map a location to a screen. The root and the bare `/certificado`
    /// section redirect to the list; anything else unknown is `None`.
    pub fn resolve(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');

        match path {
            "" | "/certificado" => Some(Route::ListaCertificado),
            _ => Route::ALL.into_iter().find(|route| route.path() == path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub route: Route,
    pub label: &'static str,
}

impl NavLink {
    pub fn is_active(&self, current: Option<Route>) -> bool {
        current == Some(self.route)
    }
}

pub const NAV_LINKS: &[NavLink] = &[
    NavLink {
        route: Route::ListaCertificado,
        label: "Certificados",
    },
    NavLink {
        route: Route::CargarCertificado,
        label: "Cargar",
    },
];
