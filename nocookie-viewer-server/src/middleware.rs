/* This file is part of the NoCookie Viewer project
*
*  Copyright (C) 2026 NoCookie Viewer contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::{future::{ready, Ready}, time::Instant};

use actix_web::{dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform}, error::{Error, HttpError}};
use futures::{future::LocalBoxFuture, FutureExt};
use log::error;

use crate::utils::{render_duration, HeaderMapExt};

pub const TIME_SPENT_HEADER: &str = "X-Time-Spent";

/// Adds an `X-Time-Spent` header with the request handling time, if enabled.
/// Mostly useful for seeing how much of a request went into waiting on oEmbed.
pub struct Timings {
    enabled: bool,
}

impl Timings {
    pub fn new(enabled: bool) -> Timings {
        Timings { enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Timings
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TimingsInstance<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimingsInstance { service, enabled: self.enabled }))
    }
}

pub struct TimingsInstance<S> {
    service: S,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for TimingsInstance<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !self.enabled {
            return self.service.call(req).boxed_local()
        }
        let start = Instant::now();
        let srv = self.service.call(req);

        async move {
            let mut resp = srv.await?;
            let elapsed = start.elapsed();
            if let Err(e) = resp.headers_mut().append_header((TIME_SPENT_HEADER, format!("{} ns", render_duration(elapsed)))) {
                error!("Failed to append the {TIME_SPENT_HEADER} header: {}", HttpError::from(e));
            }

            Ok(resp)
        }.boxed_local()
    }
}
