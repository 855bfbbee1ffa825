use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson};
use mongodb::Client;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::mongo::{is_duplicate_key, DB_NAME};
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::account::Account;
use crate::models::messaging::{
    Conversation, ConversationDetail, ConversationSummary, Message, MessageView,
    SendMessageInput, StartConversationInput,
};
use crate::models::vendor::{Service, Vendor};

/// Starts a conversation about a service, or continues the existing one.
/// The unique index on the (service, tourist, vendor) triple makes this safe
/// against concurrent first contacts: the losing insert falls back to the
/// thread the winner created. Responds 201 for a new thread, 200 otherwise.
pub async fn start_conversation(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    input: web::Json<StartConversationInput>,
) -> impl Responder {
    let client = data.into_inner();

    let input = input.into_inner();
    let (service_id, body) = match (input.service_id, input.body) {
        (Some(service_id), Some(body)) if !body.is_empty() => (service_id, body),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "service_id and body are required."
            }))
        }
    };

    let service_oid = match ObjectId::parse_str(&service_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid service ID"),
    };

    let services: mongodb::Collection<Service> = client.database(DB_NAME).collection("Services");
    let service = match services.find_one(doc! { "_id": service_oid }).await {
        Ok(Some(service)) => service,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Service not found."
            }))
        }
        Err(err) => {
            eprintln!("Failed to fetch service: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch service");
        }
    };

    let vendors: mongodb::Collection<Vendor> = client.database(DB_NAME).collection("Vendors");
    let vendor = match vendors.find_one(doc! { "_id": service.vendor_id }).await {
        Ok(Some(vendor)) => vendor,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Service not found."
            }))
        }
        Err(err) => {
            eprintln!("Failed to fetch vendor: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch vendor");
        }
    };

    if vendor.user_id == user.user_id {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "You cannot start a conversation about your own service."
        }));
    }

    let conversations: mongodb::Collection<Conversation> =
        client.database(DB_NAME).collection("Conversations");

    let triple = doc! {
        "service_id": service_oid,
        "tourist_id": user.user_id,
        "vendor_id": vendor.user_id,
    };

    let curr_time = Utc::now();
    let (conversation_id, created) = match conversations.find_one(triple.clone()).await {
        Ok(Some(existing)) => (existing.id.unwrap_or_default(), false),
        Ok(None) => {
            let conversation = Conversation {
                id: None,
                service_id: service_oid,
                tourist_id: user.user_id,
                vendor_id: vendor.user_id,
                created_at: Some(curr_time),
                updated_at: Some(curr_time),
            };
            match conversations.insert_one(&conversation).await {
                Ok(result) => (result.inserted_id.as_object_id().unwrap_or_default(), true),
                Err(err) if is_duplicate_key(&err) => {
                    // Lost the race to a concurrent first contact
                    match conversations.find_one(triple).await {
                        Ok(Some(existing)) => (existing.id.unwrap_or_default(), false),
                        _ => {
                            return HttpResponse::InternalServerError()
                                .body("Failed to start conversation")
                        }
                    }
                }
                Err(err) => {
                    eprintln!("Failed to insert conversation: {:?}", err);
                    return HttpResponse::InternalServerError().body("Failed to start conversation");
                }
            }
        }
        Err(err) => {
            eprintln!("Failed to fetch conversation: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch conversation");
        }
    };

    if let Err(resp) = append_message(&client, conversation_id, user.user_id, &body).await {
        return resp;
    }

    match load_summary(&client, conversation_id).await {
        Ok(Some(summary)) => {
            if created {
                HttpResponse::Created().json(summary)
            } else {
                HttpResponse::Ok().json(summary)
            }
        }
        Ok(None) => HttpResponse::InternalServerError().body("Failed to load conversation"),
        Err(err) => {
            eprintln!("Failed to load conversation: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to load conversation")
        }
    }
}

/// Threads where the caller is either side, most recently active first.
pub async fn get_conversations(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();
    let conversations: mongodb::Collection<Conversation> =
        client.database(DB_NAME).collection("Conversations");

    let filter = doc! {
        "$or": [
            { "tourist_id": user.user_id },
            { "vendor_id": user.user_id },
        ]
    };

    let threads = match conversations
        .find(filter)
        .sort(doc! { "updated_at": -1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<Conversation>>().await {
            Ok(threads) => threads,
            Err(err) => {
                eprintln!("Failed to collect conversations: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to collect conversations");
            }
        },
        Err(err) => {
            eprintln!("Failed to find conversations: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to find conversations");
        }
    };

    let mut summaries = Vec::with_capacity(threads.len());
    for thread in &threads {
        match summarize(&client, thread).await {
            Ok(summary) => summaries.push(summary),
            Err(err) => {
                eprintln!("Failed to summarize conversation: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to load conversations");
            }
        }
    }

    HttpResponse::Ok().json(summaries)
}

/// One thread with its full message history. Non-participants get the same
/// 404 as a missing id.
pub async fn get_conversation(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();

    let conversation_id = match ObjectId::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid conversation ID"),
    };

    let conversations: mongodb::Collection<Conversation> =
        client.database(DB_NAME).collection("Conversations");

    let filter = doc! {
        "_id": conversation_id,
        "$or": [
            { "tourist_id": user.user_id },
            { "vendor_id": user.user_id },
        ]
    };

    let thread = match conversations.find_one(filter).await {
        Ok(Some(thread)) => thread,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Conversation not found."
            }))
        }
        Err(err) => {
            eprintln!("Failed to fetch conversation: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch conversation");
        }
    };

    let summary = match summarize(&client, &thread).await {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("Failed to summarize conversation: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to load conversation");
        }
    };

    let messages: mongodb::Collection<Message> = client.database(DB_NAME).collection("Messages");
    let history = match messages
        .find(doc! { "conversation_id": conversation_id })
        .sort(doc! { "created_at": 1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<Message>>().await {
            Ok(history) => history,
            Err(err) => {
                eprintln!("Failed to collect messages: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to collect messages");
            }
        },
        Err(err) => {
            eprintln!("Failed to find messages: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to find messages");
        }
    };

    let usernames = match usernames_for(
        &client,
        &history.iter().map(|m| m.sender_id).collect::<Vec<_>>(),
    )
    .await
    {
        Ok(usernames) => usernames,
        Err(err) => {
            eprintln!("Failed to resolve senders: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to load conversation");
        }
    };

    let views = history
        .into_iter()
        .map(|message| MessageView {
            id: message.id.unwrap_or_default(),
            sender_id: message.sender_id,
            sender_username: usernames
                .get(&message.sender_id)
                .cloned()
                .unwrap_or_default(),
            body: message.body,
            created_at: message.created_at,
        })
        .collect();

    HttpResponse::Ok().json(ConversationDetail {
        summary,
        messages: views,
    })
}

/// Appends to an existing thread. Participants only; anyone else is told so
/// explicitly, not hidden behind a 404.
pub async fn send_message(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<SendMessageInput>,
) -> impl Responder {
    let client = data.into_inner();

    let conversation_id = match ObjectId::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid conversation ID"),
    };

    let conversations: mongodb::Collection<Conversation> =
        client.database(DB_NAME).collection("Conversations");

    let thread = match conversations.find_one(doc! { "_id": conversation_id }).await {
        Ok(Some(thread)) => thread,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Conversation not found."
            }))
        }
        Err(err) => {
            eprintln!("Failed to fetch conversation: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch conversation");
        }
    };

    if user.user_id != thread.tourist_id && user.user_id != thread.vendor_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You are not part of this conversation."
        }));
    }

    let body = match input.into_inner().body {
        Some(body) if !body.is_empty() => body,
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Message body cannot be empty."
            }))
        }
    };

    match append_message(&client, conversation_id, user.user_id, &body).await {
        Ok(message) => HttpResponse::Created().json(MessageView {
            id: message.id.unwrap_or_default(),
            sender_id: message.sender_id,
            sender_username: user.username,
            body: message.body,
            created_at: message.created_at,
        }),
        Err(resp) => resp,
    }
}

async fn append_message(
    client: &Client,
    conversation_id: ObjectId,
    sender_id: ObjectId,
    body: &str,
) -> Result<Message, HttpResponse> {
    let messages: mongodb::Collection<Message> = client.database(DB_NAME).collection("Messages");
    let conversations: mongodb::Collection<Conversation> =
        client.database(DB_NAME).collection("Conversations");

    let curr_time = Utc::now();
    let mut message = Message {
        id: None,
        conversation_id,
        sender_id,
        body: body.to_string(),
        is_read: false,
        created_at: Some(curr_time),
    };

    match messages.insert_one(&message).await {
        Ok(result) => {
            message.id = result.inserted_id.as_object_id();
        }
        Err(err) => {
            eprintln!("Failed to insert message: {:?}", err);
            return Err(HttpResponse::InternalServerError().body("Failed to send message"));
        }
    }

    // Bump the thread so listings surface the latest activity first
    let update = doc! {
        "$set": { "updated_at": mongodb::bson::to_bson(&curr_time).unwrap_or(Bson::Null) }
    };
    if let Err(err) = conversations
        .update_one(doc! { "_id": conversation_id }, update)
        .await
    {
        eprintln!("Failed to bump conversation: {:?}", err);
    }

    Ok(message)
}

async fn load_summary(
    client: &Client,
    conversation_id: ObjectId,
) -> mongodb::error::Result<Option<ConversationSummary>> {
    let conversations: mongodb::Collection<Conversation> =
        client.database(DB_NAME).collection("Conversations");

    match conversations.find_one(doc! { "_id": conversation_id }).await? {
        Some(thread) => Ok(Some(summarize(client, &thread).await?)),
        None => Ok(None),
    }
}

async fn summarize(
    client: &Client,
    thread: &Conversation,
) -> mongodb::error::Result<ConversationSummary> {
    let services: mongodb::Collection<Service> = client.database(DB_NAME).collection("Services");
    let messages: mongodb::Collection<Message> = client.database(DB_NAME).collection("Messages");

    let service_name = services
        .find_one(doc! { "_id": thread.service_id })
        .await?
        .map(|s| s.name)
        .unwrap_or_default();

    let usernames = usernames_for(client, &[thread.tourist_id, thread.vendor_id]).await?;

    let last_message = messages
        .find_one(doc! { "conversation_id": thread.id.unwrap_or_default() })
        .sort(doc! { "created_at": -1 })
        .await?
        .map(|m| m.body);

    Ok(ConversationSummary {
        id: thread.id.unwrap_or_default(),
        service_id: thread.service_id,
        service_name,
        tourist_id: thread.tourist_id,
        tourist_username: usernames.get(&thread.tourist_id).cloned().unwrap_or_default(),
        vendor_id: thread.vendor_id,
        vendor_username: usernames.get(&thread.vendor_id).cloned().unwrap_or_default(),
        last_message,
        updated_at: thread.updated_at,
    })
}

async fn usernames_for(
    client: &Client,
    ids: &[ObjectId],
) -> mongodb::error::Result<HashMap<ObjectId, String>> {
    let accounts: mongodb::Collection<Account> = client.database(DB_NAME).collection("Accounts");

    Ok(accounts
        .find(doc! { "_id": { "$in": ids.to_vec() } })
        .await?
        .try_collect::<Vec<Account>>()
        .await?
        .into_iter()
        .filter_map(|a| a.id.map(|id| (id, a.username)))
        .collect())
}
